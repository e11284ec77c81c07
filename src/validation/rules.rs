use super::{Check, FieldRule, Normalize, Presence, RuleSet};

pub const TITLE_MESSAGE: &str = "Task title must be between 3 and 100 characters";
pub const DESCRIPTION_MESSAGE: &str = "Task description cannot exceed 500 characters";
pub const COMPLETED_MESSAGE: &str = "Completed status must be a boolean value";

const TITLE: Check = Check::Length { min: 3, max: 100 };
const DESCRIPTION: Check = Check::Length { min: 0, max: 500 };

pub static CREATE_TASK: RuleSet = RuleSet {
    name: "create-task",
    rules: &[
        FieldRule {
            field: "title",
            presence: Presence::Required,
            normalize: Some(Normalize::Trim),
            check: TITLE,
            message: TITLE_MESSAGE,
        },
        FieldRule {
            field: "description",
            presence: Presence::Optional,
            normalize: Some(Normalize::Trim),
            check: DESCRIPTION,
            message: DESCRIPTION_MESSAGE,
        },
        FieldRule {
            field: "completed",
            presence: Presence::Optional,
            normalize: None,
            check: Check::Boolean,
            message: COMPLETED_MESSAGE,
        },
    ],
};

// Same constraints as creation; absence means "leave unchanged".
pub static UPDATE_TASK: RuleSet = RuleSet {
    name: "update-task",
    rules: &[
        FieldRule {
            field: "title",
            presence: Presence::Optional,
            normalize: Some(Normalize::Trim),
            check: TITLE,
            message: TITLE_MESSAGE,
        },
        FieldRule {
            field: "description",
            presence: Presence::Optional,
            normalize: Some(Normalize::Trim),
            check: DESCRIPTION,
            message: DESCRIPTION_MESSAGE,
        },
        FieldRule {
            field: "completed",
            presence: Presence::Optional,
            normalize: None,
            check: Check::Boolean,
            message: COMPLETED_MESSAGE,
        },
    ],
};
