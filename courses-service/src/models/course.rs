//! Course document as served by the UCSB Academic Curriculums API.
//!
//! Only the fields the frontend renders are modelled. Unknown fields are
//! dropped on read; missing scalars come back as `null` and missing lists as
//! `[]`, so a parsed document re-serializes with a stable shape.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Course {
    pub quarter: Option<String>,
    pub course_id: Option<String>,
    pub title: Option<String>,
    pub contact_hours: Option<i32>,
    pub description: Option<String>,
    pub college: Option<String>,
    pub obj_level_code: Option<String>,
    pub subject_area: Option<String>,
    pub units_fixed: Option<i32>,
    pub units_variable_high: Option<i32>,
    pub units_variable_low: Option<i32>,
    pub delayed_sectioning: Option<String>,
    pub in_progress_course: Option<bool>,
    pub grading_option: Option<String>,
    pub instruction_type: Option<String>,
    pub on_line_course: Option<bool>,
    pub dept_code: Option<String>,
    pub general_education: Vec<GeneralEducation>,
    pub class_sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralEducation {
    pub ge_code: Option<String>,
    pub ge_college: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Section {
    pub enroll_code: Option<String>,
    pub section: Option<String>,
    pub session: Option<String>,
    pub class_closed: Option<String>,
    pub course_cancelled: Option<String>,
    pub grading_option_code: Option<String>,
    pub enrolled_total: Option<i32>,
    pub max_enroll: Option<i32>,
    pub secondary_status: Option<String>,
    pub department_approval_required: Option<bool>,
    pub instructor_approval_required: Option<bool>,
    pub restriction_level: Option<String>,
    pub restriction_major: Option<String>,
    pub restriction_major_pass: Option<String>,
    pub restriction_minor: Option<String>,
    pub restriction_minor_pass: Option<String>,
    pub concurrent_courses: Vec<String>,
    pub time_locations: Vec<TimeLocation>,
    pub instructors: Vec<Instructor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeLocation {
    pub room: Option<String>,
    pub building: Option<String>,
    pub room_capacity: Option<i32>,
    pub days: Option<String>,
    pub begin_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Instructor {
    pub instructor: Option<String>,
    pub function_code: Option<String>,
}
