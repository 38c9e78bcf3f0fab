mod date;

pub use date::RuleDate;

use serde::Serialize;

const MAIN_COMPONENT: &str = "main";
const SABBATH_MODE_CAPABILITY: &str = "samsungce.sabbathMode";

/// A SmartThings rule as accepted by the create endpoint. Only the subset of the rule schema
/// needed for date-gated device commands is modelled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub name: String,
    pub time_zone_id: String,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    If(IfAction),
    Command(CommandAction),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfAction {
    #[serde(flatten)]
    pub condition: Condition,
    pub then: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
    And(Vec<Condition>),
    Equals(Equals),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Equals {
    pub left: Operand,
    pub right: Operand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operand {
    Device(DeviceOperand),
    String(String),
    Date(DateOperand),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceOperand {
    pub devices: Vec<String>,
    pub component: String,
    pub capability: String,
    pub attribute: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateOperand {
    pub time_zone_id: String,
    #[serde(flatten)]
    pub value: DateValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DateValue {
    Reference { reference: DateReference },
    Fixed { year: i32, month: u32, day: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DateReference {
    Today,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandAction {
    pub devices: Vec<String>,
    pub commands: Vec<DeviceCommand>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceCommand {
    pub component: String,
    pub capability: String,
    pub command: String,
    pub arguments: Vec<serde_json::Value>,
}

/// Everything a holiday rule needs besides its name and date.
#[derive(Debug, Clone)]
pub struct RuleTemplate {
    device_id: String,
    virtual_switch_id: String,
    time_zone: String,
}

impl RuleTemplate {
    pub fn new(device_id: &str, virtual_switch_id: &str, time_zone: &str) -> Self {
        Self {
            device_id: device_id.to_owned(),
            virtual_switch_id: virtual_switch_id.to_owned(),
            time_zone: time_zone.to_owned(),
        }
    }

    /// Turns on sabbath mode of the device on `date`, as long as the virtual switch is on.
    pub fn sabbath_mode_rule(&self, name: &str, date: RuleDate) -> Rule {
        let switch_is_on = Condition::Equals(Equals {
            left: Operand::Device(DeviceOperand {
                devices: vec![self.virtual_switch_id.clone()],
                component: MAIN_COMPONENT.to_owned(),
                capability: "switch".to_owned(),
                attribute: "switch".to_owned(),
            }),
            right: Operand::String("on".to_owned()),
        });

        let today_is_date = Condition::Equals(Equals {
            left: Operand::Date(self.date_operand(DateValue::Reference {
                reference: DateReference::Today,
            })),
            right: Operand::Date(self.date_operand(DateValue::Fixed {
                year: date.year(),
                month: date.month(),
                day: date.day(),
            })),
        });

        let sabbath_mode_on = Action::Command(CommandAction {
            devices: vec![self.device_id.clone()],
            commands: vec![DeviceCommand {
                component: MAIN_COMPONENT.to_owned(),
                capability: SABBATH_MODE_CAPABILITY.to_owned(),
                command: "on".to_owned(),
                arguments: vec![],
            }],
        });

        Rule {
            name: name.to_owned(),
            time_zone_id: self.time_zone.clone(),
            actions: vec![Action::If(IfAction {
                condition: Condition::And(vec![switch_is_on, today_is_date]),
                then: vec![sabbath_mode_on],
            })],
        }
    }

    fn date_operand(&self, value: DateValue) -> DateOperand {
        DateOperand {
            time_zone_id: self.time_zone.clone(),
            value,
        }
    }
}

#[cfg(test)]
mod test {
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn sabbath_mode_rule() {
        let template = RuleTemplate::new("fridge-1", "switch-1", "America/New_York");
        let date: RuleDate = "2024-10-03".parse().unwrap();

        assert_json_eq!(
            template.sabbath_mode_rule("Rosh Hashana First Days (2024)", date),
            json!({
                "name": "Rosh Hashana First Days (2024)",
                "timeZoneId": "America/New_York",
                "actions": [{
                    "if": {
                        "and": [
                            {
                                "equals": {
                                    "left": {
                                        "device": {
                                            "devices": ["switch-1"],
                                            "component": "main",
                                            "capability": "switch",
                                            "attribute": "switch"
                                        }
                                    },
                                    "right": { "string": "on" }
                                }
                            },
                            {
                                "equals": {
                                    "left": {
                                        "date": {
                                            "timeZoneId": "America/New_York",
                                            "reference": "Today"
                                        }
                                    },
                                    "right": {
                                        "date": {
                                            "timeZoneId": "America/New_York",
                                            "year": 2024,
                                            "month": 10,
                                            "day": 3
                                        }
                                    }
                                }
                            }
                        ],
                        "then": [{
                            "command": {
                                "devices": ["fridge-1"],
                                "commands": [{
                                    "component": "main",
                                    "capability": "samsungce.sabbathMode",
                                    "command": "on",
                                    "arguments": []
                                }]
                            }
                        }]
                    }
                }]
            })
        );
    }

    #[test]
    fn time_zone_applies_to_rule_and_both_dates() {
        let template = RuleTemplate::new("fridge-1", "switch-1", "Asia/Jerusalem");
        let rule = template.sabbath_mode_rule("Pesach (2025)", "2025-04-13".parse().unwrap());

        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["timeZoneId"], "Asia/Jerusalem");

        let dates = &json["actions"][0]["if"]["and"][1]["equals"];
        assert_eq!(dates["left"]["date"]["timeZoneId"], "Asia/Jerusalem");
        assert_eq!(dates["right"]["date"]["timeZoneId"], "Asia/Jerusalem");
    }
}
