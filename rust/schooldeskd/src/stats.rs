//! Aggregate snapshots over a collection, recomputed on every call.

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::calc::{
    self, count_by_tag, engagement_bucket, DistributionBin, GradeSample, GradingRules, TagCount,
    AVERAGE_BINS, ENGAGEMENT_BUCKETS, GRADE_SCALE,
};
use crate::error::EngineError;
use crate::query::{self, QuerySpec, Record};
use crate::records::{
    AUDIENCES, CHANNELS, CONTRACTS, EXAM_STATUSES, EXAM_TYPES, FEE_STATUSES, GENDERS,
    MESSAGE_STATUSES, PARENT_STATUSES, RELATIONS, STUDENT_STATUSES, SUBJECT_STATUSES,
    TEACHER_STATUSES,
};
use crate::store::{
    EntityStore, Exam, Message, Parent, Student, Subject, Teacher, CLASSES, DEPARTMENTS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Filtered,
}

impl Scope {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Scope::All),
            "filtered" => Some(Scope::Filtered),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::All => "all",
            Scope::Filtered => "filtered",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSnapshot {
    pub labeled_counts: BTreeMap<&'static str, Vec<TagCount>>,
    pub numeric_summaries: BTreeMap<&'static str, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Vec<DistributionBin>>,
}

impl AggregateSnapshot {
    fn counts<'a, I>(&mut self, name: &'static str, tags: I, known: &[&str])
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.labeled_counts.insert(name, count_by_tag(tags, known));
    }

    fn number(&mut self, name: &'static str, v: impl Into<Value>) {
        self.numeric_summaries.insert(name, v.into());
    }

    fn measure(&mut self, name: &'static str, v: Option<f64>) {
        self.numeric_summaries.insert(name, json!(v));
    }
}

/// Collections that know how to summarize themselves.
pub trait Summarize: Record {
    fn summarize(rows: &[&Self], rules: &GradingRules) -> AggregateSnapshot;
}

/// Snapshot over the whole collection or over the rows a query selects.
pub fn snapshot<R: Summarize>(
    store: &dyn EntityStore,
    scope: Scope,
    spec: &QuerySpec,
    rules: &GradingRules,
) -> Result<AggregateSnapshot, EngineError> {
    let records = R::collection(store);
    let rows: Vec<&R> = match scope {
        Scope::All => records.iter().collect(),
        Scope::Filtered => query::select(records, spec)?,
    };
    Ok(R::summarize(&rows, rules))
}

fn rounded_mean(values: &[f64]) -> Option<f64> {
    calc::mean(values).map(calc::round_off_1_decimal)
}

/// Share of /20 averages at or above the pass threshold, in percent.
fn averages_pass_rate(averages: &[f64], rules: &GradingRules) -> Option<f64> {
    calc::pass_rate(
        averages.iter().map(|a| GradeSample::new(*a, GRADE_SCALE)),
        rules.pass_threshold,
    )
}

impl Summarize for Student {
    fn summarize(rows: &[&Self], rules: &GradingRules) -> AggregateSnapshot {
        let mut s = AggregateSnapshot::default();
        let mut averages: Vec<f64> = rows.iter().filter_map(|r| r.average).collect();
        s.number("total", rows.len());
        s.number("active", rows.iter().filter(|r| r.status == "active").count());
        s.number("graded", averages.len());
        s.measure("averageOfAverages", rounded_mean(&averages));
        s.measure("passRate", averages_pass_rate(&averages, rules));
        s.distribution = Some(calc::distribution(&averages, &AVERAGE_BINS));
        s.measure("medianAverage", calc::median(&mut averages));
        s.counts("class", rows.iter().map(|r| r.class_name.as_str()), &CLASSES);
        s.counts("gender", rows.iter().map(|r| r.gender.as_str()), &GENDERS);
        s.counts("status", rows.iter().map(|r| r.status.as_str()), &STUDENT_STATUSES);
        s.counts("feeStatus", rows.iter().map(|r| r.fee_status.as_str()), &FEE_STATUSES);
        s
    }
}

impl Summarize for Teacher {
    fn summarize(rows: &[&Self], _rules: &GradingRules) -> AggregateSnapshot {
        let mut s = AggregateSnapshot::default();
        let ratings: Vec<f64> = rows.iter().filter_map(|r| r.rating).collect();
        s.number("total", rows.len());
        s.number("active", rows.iter().filter(|r| r.status == "active").count());
        s.measure("averageRating", rounded_mean(&ratings));
        s.counts("department", rows.iter().map(|r| r.department.as_str()), &DEPARTMENTS);
        s.counts("status", rows.iter().map(|r| r.status.as_str()), &TEACHER_STATUSES);
        s.counts("contract", rows.iter().map(|r| r.contract.as_str()), &CONTRACTS);
        s
    }
}

impl Summarize for Parent {
    fn summarize(rows: &[&Self], _rules: &GradingRules) -> AggregateSnapshot {
        let mut s = AggregateSnapshot::default();
        let scores: Vec<f64> = rows.iter().map(|r| f64::from(r.engagement_score)).collect();
        let bucket_tags: Vec<&str> = ENGAGEMENT_BUCKETS.iter().map(|b| b.tag).collect();
        s.number("total", rows.len());
        s.number("childrenTotal", rows.iter().map(|r| r.children.len()).sum::<usize>());
        s.measure("averageEngagement", rounded_mean(&scores));
        s.counts("relation", rows.iter().map(|r| r.relation.as_str()), &RELATIONS);
        s.counts("status", rows.iter().map(|r| r.status.as_str()), &PARENT_STATUSES);
        s.counts(
            "engagement",
            scores.iter().map(|v| engagement_bucket(*v).as_str()),
            &bucket_tags,
        );
        s
    }
}

impl Summarize for Exam {
    fn summarize(rows: &[&Self], rules: &GradingRules) -> AggregateSnapshot {
        let mut s = AggregateSnapshot::default();
        let averages: Vec<f64> = rows.iter().filter_map(|r| r.average).collect();
        s.number("total", rows.len());
        s.number("completed", rows.iter().filter(|r| r.status == "completed").count());
        s.number("upcoming", rows.iter().filter(|r| r.status == "scheduled").count());
        s.measure("averageOfAverages", rounded_mean(&averages));
        s.measure("passRate", averages_pass_rate(&averages, rules));
        s.distribution = Some(calc::distribution(&averages, &AVERAGE_BINS));
        s.counts("status", rows.iter().map(|r| r.status.as_str()), &EXAM_STATUSES);
        s.counts("type", rows.iter().map(|r| r.exam_type.as_str()), &EXAM_TYPES);
        s.counts("class", rows.iter().map(|r| r.class_name.as_str()), &CLASSES);
        s
    }
}

impl Summarize for Subject {
    fn summarize(rows: &[&Self], _rules: &GradingRules) -> AggregateSnapshot {
        let mut s = AggregateSnapshot::default();
        let coefficients: Vec<f64> = rows.iter().map(|r| r.coefficient).collect();
        s.number("total", rows.len());
        s.number("active", rows.iter().filter(|r| r.status == "active").count());
        s.measure(
            "weeklyHoursTotal",
            Some(rows.iter().map(|r| r.weekly_hours).sum::<f64>()),
        );
        s.measure("averageCoefficient", rounded_mean(&coefficients));
        s.counts("department", rows.iter().map(|r| r.department.as_str()), &DEPARTMENTS);
        s.counts("status", rows.iter().map(|r| r.status.as_str()), &SUBJECT_STATUSES);
        s
    }
}

impl Summarize for Message {
    fn summarize(rows: &[&Self], _rules: &GradingRules) -> AggregateSnapshot {
        let mut s = AggregateSnapshot::default();
        let sent: Vec<&&Message> = rows.iter().filter(|r| r.status == "sent").collect();
        let sent_recipients: u64 = sent.iter().map(|r| u64::from(r.recipients)).sum();
        let sent_reads: u64 = sent.iter().map(|r| u64::from(r.read_count)).sum();
        s.number("total", rows.len());
        s.number("sent", sent.len());
        s.number(
            "recipientsTotal",
            rows.iter().map(|r| u64::from(r.recipients)).sum::<u64>(),
        );
        s.measure(
            "readRate",
            (sent_recipients > 0).then(|| {
                calc::round_off_1_decimal(100.0 * sent_reads as f64 / sent_recipients as f64)
            }),
        );
        s.counts("channel", rows.iter().map(|r| r.channel.as_str()), &CHANNELS);
        s.counts("status", rows.iter().map(|r| r.status.as_str()), &MESSAGE_STATUSES);
        s.counts("audience", rows.iter().map(|r| r.audience.as_str()), &AUDIENCES);
        s
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankEntry {
    pub rank: usize,
    pub student_id: String,
    pub name: String,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRanking {
    pub class_name: String,
    pub cohort_size: usize,
    pub ranking: Vec<RankEntry>,
    /// Students without an average yet; they are not ranked.
    pub ungraded: Vec<String>,
}

/// Competition ranking of a class by average: ties share a rank and the next rank skips.
pub fn class_ranking(store: &dyn EntityStore, class_name: &str) -> Result<ClassRanking, EngineError> {
    if !CLASSES.iter().any(|c| *c == class_name) {
        return Err(EngineError::UnknownFilterValue {
            field: "className".to_string(),
            value: class_name.to_string(),
            allowed: CLASSES.to_vec(),
        });
    }
    let mut graded: Vec<(&Student, f64)> = Vec::new();
    let mut ungraded = Vec::new();
    for s in store.class_students(class_name) {
        match s.average {
            Some(avg) => graded.push((s, avg)),
            None => ungraded.push(s.id.clone()),
        }
    }
    let cohort: Vec<f64> = graded.iter().map(|(_, avg)| *avg).collect();
    graded.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let ranking = graded
        .iter()
        .map(|(s, avg)| RankEntry {
            rank: calc::competition_rank(&cohort, *avg).unwrap_or(cohort.len()),
            student_id: s.id.clone(),
            name: format!("{} {}", s.last_name, s.first_name),
            average: *avg,
        })
        .collect();
    Ok(ClassRanking {
        class_name: class_name.to_string(),
        cohort_size: cohort.len(),
        ranking,
        ungraded,
    })
}

/// Headline figures for the home screen.
pub fn dashboard_overview(store: &dyn EntityStore, rules: &GradingRules) -> Value {
    let students = store.students();
    let averages: Vec<f64> = students.iter().filter_map(|s| s.average).collect();
    let engagement: Vec<f64> = store
        .parents()
        .iter()
        .map(|p| f64::from(p.engagement_score))
        .collect();
    let unpaid = students.iter().filter(|s| s.fee_status != "paid").count();
    json!({
        "students": {
            "total": students.len(),
            "active": students.iter().filter(|s| s.status == "active").count(),
            "averageOfAverages": rounded_mean(&averages),
            "passRate": averages_pass_rate(&averages, rules),
            "feesOutstanding": unpaid,
        },
        "teachers": {
            "total": store.teachers().len(),
            "active": store.teachers().iter().filter(|t| t.status == "active").count(),
        },
        "parents": {
            "total": store.parents().len(),
            "averageEngagement": rounded_mean(&engagement),
        },
        "exams": {
            "total": store.exams().len(),
            "upcoming": store.exams().iter().filter(|e| e.status == "scheduled").count(),
            "completed": store.exams().iter().filter(|e| e.status == "completed").count(),
        },
        "subjects": {
            "total": store.subjects().len(),
            "active": store.subjects().iter().filter(|s| s.status == "active").count(),
        },
        "messages": {
            "total": store.messages().len(),
            "sent": store.messages().iter().filter(|m| m.status == "sent").count(),
        },
    })
}
