use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub class_name: String,
    pub birth_date: NaiveDate,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub fee_status: String,
    pub parent_id: String,
    pub enrolled_on: NaiveDate,
    /// Average on the 20-point scale; `None` until a grade exists.
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub subjects: Vec<String>,
    pub classes: Vec<String>,
    pub status: String,
    pub contract: String,
    pub hired_on: NaiveDate,
    /// Mean evaluation score (0-100); `None` before the first evaluation.
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildLink {
    pub student_id: String,
    pub name: String,
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parent {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub relation: String,
    pub profession: String,
    pub status: String,
    pub engagement_score: u8,
    pub children: Vec<ChildLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: String,
    pub title: String,
    pub subject_code: String,
    pub class_name: String,
    pub exam_type: String,
    pub date: NaiveDate,
    pub duration_minutes: u32,
    pub max_score: f64,
    pub room: String,
    pub status: String,
    /// Class average on the 20-point scale, once the exam is completed.
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub code: String,
    pub name: String,
    pub department: String,
    pub coefficient: f64,
    pub weekly_hours: f64,
    pub classes: Vec<String>,
    pub teacher_id: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub title: String,
    pub body: String,
    pub sender: String,
    pub audience: String,
    pub channel: String,
    pub status: String,
    pub sent_on: NaiveDate,
    pub recipients: u32,
    pub read_count: u32,
}

impl Message {
    /// Read percentage; 0 when nobody was addressed.
    pub fn read_rate(&self) -> f64 {
        if self.recipients == 0 {
            return 0.0;
        }
        crate::calc::round_off_1_decimal(100.0 * f64::from(self.read_count) / f64::from(self.recipients))
    }
}
