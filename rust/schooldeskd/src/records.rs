//! Query schemas for the six collections and their `Record` impls.

use std::borrow::Cow;

use crate::calc::ENGAGEMENT_BUCKETS;
use crate::query::{
    ColumnDef, FieldValue, FilterDef, FilterKind, Record, Schema, SortDef, SortKind,
};
use crate::store::{
    EntityStore, Exam, Message, Parent, Student, Subject, Teacher, CLASSES, DEPARTMENTS,
    SUBJECT_CODES,
};

pub const GENDERS: [&str; 2] = ["male", "female"];
pub const STUDENT_STATUSES: [&str; 3] = ["active", "suspended", "transferred"];
pub const FEE_STATUSES: [&str; 3] = ["paid", "partial", "unpaid"];
pub const TEACHER_STATUSES: [&str; 3] = ["active", "on_leave", "suspended"];
pub const CONTRACTS: [&str; 3] = ["permanent", "contract", "substitute"];
pub const RELATIONS: [&str; 3] = ["father", "mother", "guardian"];
pub const PARENT_STATUSES: [&str; 2] = ["active", "inactive"];
pub const EXAM_TYPES: [&str; 4] = ["quiz", "test", "midterm", "final"];
pub const EXAM_STATUSES: [&str; 4] = ["scheduled", "ongoing", "completed", "cancelled"];
pub const SUBJECT_STATUSES: [&str; 2] = ["active", "archived"];
pub const AUDIENCES: [&str; 5] = ["everyone", "parents", "teachers", "students", "class"];
pub const CHANNELS: [&str; 3] = ["email", "sms", "app"];
pub const MESSAGE_STATUSES: [&str; 4] = ["draft", "scheduled", "sent", "failed"];

const fn tag(name: &'static str, key: &'static str, tags: &'static [&'static str]) -> FilterDef {
    FilterDef {
        name,
        key,
        kind: FilterKind::Tag(tags),
    }
}

const fn text(name: &'static str, key: &'static str) -> SortDef {
    SortDef {
        name,
        key,
        kind: SortKind::Text,
    }
}

const fn number(name: &'static str, key: &'static str) -> SortDef {
    SortDef {
        name,
        key,
        kind: SortKind::Number,
    }
}

const fn col(key: &'static str) -> ColumnDef {
    ColumnDef {
        key,
        labeled: false,
    }
}

const fn labeled(key: &'static str) -> ColumnDef {
    ColumnDef { key, labeled: true }
}

fn person_name<'a>(last: &str, first: &str) -> FieldValue<'a> {
    FieldValue::Text(Cow::Owned(format!("{} {}", last, first)))
}

fn borrowed(s: &str) -> FieldValue<'_> {
    FieldValue::Text(Cow::Borrowed(s))
}

fn list(items: &[String]) -> FieldValue<'_> {
    FieldValue::Tags(items.iter().map(String::as_str).collect())
}

fn empty<'a>() -> FieldValue<'a> {
    FieldValue::Text(Cow::Borrowed(""))
}

static STUDENT_SCHEMA: Schema = Schema {
    entity: "students",
    search_keys: &["name", "id", "email", "phone"],
    filters: &[
        tag("class", "className", &CLASSES),
        tag("gender", "gender", &GENDERS),
        tag("status", "status", &STUDENT_STATUSES),
        tag("feeStatus", "feeStatus", &FEE_STATUSES),
    ],
    sort_keys: &[
        text("name", "name"),
        text("id", "id"),
        text("class", "className"),
        number("average", "average"),
        text("birthDate", "birthDate"),
    ],
    default_sort: "name",
    columns: &[
        col("id"),
        col("lastName"),
        col("firstName"),
        labeled("gender"),
        col("className"),
        col("birthDate"),
        col("email"),
        col("phone"),
        labeled("status"),
        labeled("feeStatus"),
        col("average"),
    ],
};

impl Record for Student {
    fn schema() -> &'static Schema {
        &STUDENT_SCHEMA
    }

    fn collection(store: &dyn EntityStore) -> &[Self] {
        store.students()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn value(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => borrowed(&self.id),
            "name" => person_name(&self.last_name, &self.first_name),
            "firstName" => borrowed(&self.first_name),
            "lastName" => borrowed(&self.last_name),
            "gender" => borrowed(&self.gender),
            "className" => borrowed(&self.class_name),
            "birthDate" => FieldValue::Text(Cow::Owned(self.birth_date.to_string())),
            "email" => borrowed(&self.email),
            "phone" => borrowed(&self.phone),
            "status" => borrowed(&self.status),
            "feeStatus" => borrowed(&self.fee_status),
            "parentId" => borrowed(&self.parent_id),
            "average" => FieldValue::Number(self.average),
            _ => empty(),
        }
    }
}

static TEACHER_SCHEMA: Schema = Schema {
    entity: "teachers",
    search_keys: &["name", "id", "email", "phone", "subjects"],
    filters: &[
        tag("department", "department", &DEPARTMENTS),
        tag("status", "status", &TEACHER_STATUSES),
        tag("contract", "contract", &CONTRACTS),
        tag("class", "classes", &CLASSES),
    ],
    sort_keys: &[
        text("name", "name"),
        text("id", "id"),
        text("department", "department"),
        number("rating", "rating"),
        text("hiredOn", "hiredOn"),
    ],
    default_sort: "name",
    columns: &[
        col("id"),
        col("lastName"),
        col("firstName"),
        labeled("department"),
        col("subjects"),
        col("classes"),
        col("email"),
        col("phone"),
        labeled("status"),
        labeled("contract"),
        col("hiredOn"),
        col("rating"),
    ],
};

impl Record for Teacher {
    fn schema() -> &'static Schema {
        &TEACHER_SCHEMA
    }

    fn collection(store: &dyn EntityStore) -> &[Self] {
        store.teachers()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn value(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => borrowed(&self.id),
            "name" => person_name(&self.last_name, &self.first_name),
            "firstName" => borrowed(&self.first_name),
            "lastName" => borrowed(&self.last_name),
            "email" => borrowed(&self.email),
            "phone" => borrowed(&self.phone),
            "department" => borrowed(&self.department),
            "subjects" => list(&self.subjects),
            "classes" => list(&self.classes),
            "status" => borrowed(&self.status),
            "contract" => borrowed(&self.contract),
            "hiredOn" => FieldValue::Text(Cow::Owned(self.hired_on.to_string())),
            "rating" => FieldValue::Number(self.rating),
            _ => empty(),
        }
    }
}

static PARENT_SCHEMA: Schema = Schema {
    entity: "parents",
    search_keys: &["name", "id", "email", "phone", "children"],
    filters: &[
        tag("relation", "relation", &RELATIONS),
        tag("status", "status", &PARENT_STATUSES),
        FilterDef {
            name: "engagement",
            key: "engagementScore",
            kind: FilterKind::Range(&ENGAGEMENT_BUCKETS),
        },
    ],
    sort_keys: &[
        text("name", "name"),
        text("id", "id"),
        number("engagement", "engagementScore"),
        number("children", "childrenCount"),
    ],
    default_sort: "name",
    columns: &[
        col("id"),
        col("lastName"),
        col("firstName"),
        labeled("relation"),
        col("email"),
        col("phone"),
        col("address"),
        col("profession"),
        labeled("status"),
        col("engagementScore"),
        col("children"),
    ],
};

impl Record for Parent {
    fn schema() -> &'static Schema {
        &PARENT_SCHEMA
    }

    fn collection(store: &dyn EntityStore) -> &[Self] {
        store.parents()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn value(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => borrowed(&self.id),
            "name" => person_name(&self.last_name, &self.first_name),
            "firstName" => borrowed(&self.first_name),
            "lastName" => borrowed(&self.last_name),
            "email" => borrowed(&self.email),
            "phone" => borrowed(&self.phone),
            "address" => borrowed(&self.address),
            "relation" => borrowed(&self.relation),
            "profession" => borrowed(&self.profession),
            "status" => borrowed(&self.status),
            "engagementScore" => FieldValue::Number(Some(f64::from(self.engagement_score))),
            "children" => FieldValue::Tags(self.children.iter().map(|c| c.name.as_str()).collect()),
            "childrenCount" => FieldValue::Number(Some(self.children.len() as f64)),
            _ => empty(),
        }
    }
}

static EXAM_SCHEMA: Schema = Schema {
    entity: "exams",
    search_keys: &["title", "id", "subjectCode", "room"],
    filters: &[
        tag("class", "className", &CLASSES),
        tag("subject", "subjectCode", &SUBJECT_CODES),
        tag("type", "examType", &EXAM_TYPES),
        tag("status", "status", &EXAM_STATUSES),
    ],
    sort_keys: &[
        text("date", "date"),
        text("title", "title"),
        text("subject", "subjectCode"),
        text("class", "className"),
        number("average", "average"),
        number("duration", "durationMinutes"),
    ],
    default_sort: "date",
    columns: &[
        col("id"),
        col("title"),
        col("subjectCode"),
        col("className"),
        labeled("examType"),
        col("date"),
        col("durationMinutes"),
        col("maxScore"),
        col("room"),
        labeled("status"),
        col("average"),
    ],
};

impl Record for Exam {
    fn schema() -> &'static Schema {
        &EXAM_SCHEMA
    }

    fn collection(store: &dyn EntityStore) -> &[Self] {
        store.exams()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn value(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => borrowed(&self.id),
            "title" => borrowed(&self.title),
            "subjectCode" => borrowed(&self.subject_code),
            "className" => borrowed(&self.class_name),
            "examType" => borrowed(&self.exam_type),
            "date" => FieldValue::Text(Cow::Owned(self.date.to_string())),
            "durationMinutes" => FieldValue::Number(Some(f64::from(self.duration_minutes))),
            "maxScore" => FieldValue::Number(Some(self.max_score)),
            "room" => borrowed(&self.room),
            "status" => borrowed(&self.status),
            "average" => FieldValue::Number(self.average),
            _ => empty(),
        }
    }
}

static SUBJECT_SCHEMA: Schema = Schema {
    entity: "subjects",
    search_keys: &["name", "code", "id"],
    filters: &[
        tag("department", "department", &DEPARTMENTS),
        tag("status", "status", &SUBJECT_STATUSES),
        tag("class", "classes", &CLASSES),
    ],
    sort_keys: &[
        text("name", "name"),
        text("code", "code"),
        number("coefficient", "coefficient"),
        number("weeklyHours", "weeklyHours"),
    ],
    default_sort: "name",
    columns: &[
        col("id"),
        col("code"),
        col("name"),
        labeled("department"),
        col("coefficient"),
        col("weeklyHours"),
        col("classes"),
        col("teacherId"),
        labeled("status"),
    ],
};

impl Record for Subject {
    fn schema() -> &'static Schema {
        &SUBJECT_SCHEMA
    }

    fn collection(store: &dyn EntityStore) -> &[Self] {
        store.subjects()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn value(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => borrowed(&self.id),
            "code" => borrowed(&self.code),
            "name" => borrowed(&self.name),
            "department" => borrowed(&self.department),
            "coefficient" => FieldValue::Number(Some(self.coefficient)),
            "weeklyHours" => FieldValue::Number(Some(self.weekly_hours)),
            "classes" => list(&self.classes),
            "teacherId" => borrowed(&self.teacher_id),
            "status" => borrowed(&self.status),
            _ => empty(),
        }
    }
}

static MESSAGE_SCHEMA: Schema = Schema {
    entity: "messages",
    search_keys: &["title", "sender", "body"],
    filters: &[
        tag("audience", "audience", &AUDIENCES),
        tag("channel", "channel", &CHANNELS),
        tag("status", "status", &MESSAGE_STATUSES),
    ],
    sort_keys: &[
        text("sentOn", "sentOn"),
        text("title", "title"),
        number("recipients", "recipients"),
        number("readRate", "readRate"),
    ],
    default_sort: "sentOn",
    columns: &[
        col("id"),
        col("title"),
        col("sender"),
        labeled("audience"),
        labeled("channel"),
        labeled("status"),
        col("sentOn"),
        col("recipients"),
        col("readCount"),
        col("readRate"),
    ],
};

impl Record for Message {
    fn schema() -> &'static Schema {
        &MESSAGE_SCHEMA
    }

    fn collection(store: &dyn EntityStore) -> &[Self] {
        store.messages()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn value(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => borrowed(&self.id),
            "title" => borrowed(&self.title),
            "body" => borrowed(&self.body),
            "sender" => borrowed(&self.sender),
            "audience" => borrowed(&self.audience),
            "channel" => borrowed(&self.channel),
            "status" => borrowed(&self.status),
            "sentOn" => FieldValue::Text(Cow::Owned(self.sent_on.to_string())),
            "recipients" => FieldValue::Number(Some(f64::from(self.recipients))),
            "readCount" => FieldValue::Number(Some(f64::from(self.read_count))),
            "readRate" => FieldValue::Number(Some(self.read_rate())),
            _ => empty(),
        }
    }
}
