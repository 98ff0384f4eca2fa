//! Deterministic mock data. Every value is a pure function of a row index;
//! no clock and no randomness.

use chrono::{Days, NaiveDate};

use super::entities::{ChildLink, Exam, Message, Parent, Student, Subject, Teacher};
use super::MockStore;
use crate::calc::GradingRules;
use crate::derived;
use crate::query::sort::ascii_fold;
use crate::records::{AUDIENCES, CHANNELS};

pub const CLASSES: [&str; 9] = ["NS1", "NS2", "NS3", "CP1", "CP2", "CE1", "CE2", "CM1", "CM2"];

pub const DEPARTMENTS: [&str; 5] = ["sciences", "languages", "humanities", "arts", "sports"];

pub const SUBJECT_CODES: [&str; 12] = [
    "MATH", "FR", "LEC", "ECR", "ANG", "SCI", "INFO", "HG", "EC", "ART", "MUS", "EPS",
];

struct SubjectRow {
    code: &'static str,
    name: &'static str,
    department: &'static str,
    coefficient: f64,
    weekly_hours: f64,
    /// Index into `CLASSES` of the first class taking the subject.
    from_class: usize,
    status: &'static str,
}

const SUBJECT_ROWS: [SubjectRow; 12] = [
    SubjectRow { code: "MATH", name: "Mathématiques", department: "sciences", coefficient: 4.0, weekly_hours: 6.0, from_class: 0, status: "active" },
    SubjectRow { code: "FR", name: "Français", department: "languages", coefficient: 4.0, weekly_hours: 7.0, from_class: 0, status: "active" },
    SubjectRow { code: "LEC", name: "Lecture", department: "languages", coefficient: 2.0, weekly_hours: 3.0, from_class: 3, status: "active" },
    SubjectRow { code: "ECR", name: "Écriture", department: "languages", coefficient: 2.0, weekly_hours: 2.0, from_class: 3, status: "active" },
    SubjectRow { code: "ANG", name: "Anglais", department: "languages", coefficient: 1.0, weekly_hours: 2.0, from_class: 5, status: "active" },
    SubjectRow { code: "SCI", name: "Sciences", department: "sciences", coefficient: 2.0, weekly_hours: 2.0, from_class: 3, status: "active" },
    SubjectRow { code: "INFO", name: "Informatique", department: "sciences", coefficient: 1.0, weekly_hours: 1.0, from_class: 5, status: "active" },
    SubjectRow { code: "HG", name: "Histoire-Géographie", department: "humanities", coefficient: 2.0, weekly_hours: 2.0, from_class: 3, status: "active" },
    SubjectRow { code: "EC", name: "Éducation civique", department: "humanities", coefficient: 1.0, weekly_hours: 1.0, from_class: 3, status: "active" },
    SubjectRow { code: "ART", name: "Arts plastiques", department: "arts", coefficient: 1.0, weekly_hours: 1.5, from_class: 0, status: "active" },
    SubjectRow { code: "MUS", name: "Musique", department: "arts", coefficient: 1.0, weekly_hours: 1.0, from_class: 0, status: "archived" },
    SubjectRow { code: "EPS", name: "Éducation physique", department: "sports", coefficient: 1.0, weekly_hours: 2.0, from_class: 0, status: "active" },
];

const MALE_FIRST: [&str; 12] = [
    "Koffi", "Yao", "Kouassi", "Adama", "Moussa", "Ibrahim", "Éric", "Jean", "Serge", "Olivier",
    "Désiré", "Amadou",
];

const FEMALE_FIRST: [&str; 12] = [
    "Aya", "Adjoua", "Awa", "Fatou", "Mariam", "Hélène", "Zoé", "Christelle", "Aminata", "Nadège",
    "Estelle", "Bintou",
];

const LAST_NAMES: [&str; 20] = [
    "Kouamé", "Konan", "Traoré", "Koné", "Diallo", "Yao", "Bamba", "Ouattara", "Coulibaly",
    "N'Guessan", "Touré", "Kouadio", "Diabaté", "Aka", "Gnagne", "Brou", "Assi", "Camara",
    "Sanogo", "Zadi",
];

const STREETS: [&str; 6] = [
    "rue des Jardins",
    "boulevard Latrille",
    "avenue Chardy",
    "rue du Commerce",
    "rue des Écoles",
    "boulevard de Marseille",
];

const DISTRICTS: [&str; 5] = ["Cocody", "Yopougon", "Plateau", "Marcory", "Treichville"];

const PROFESSIONS: [&str; 8] = [
    "Commerçant",
    "Enseignant",
    "Infirmière",
    "Comptable",
    "Chauffeur",
    "Ingénieur",
    "Couturière",
    "Fonctionnaire",
];

const EXAM_TYPES: [(&str, &str, f64, u32); 4] = [
    ("quiz", "Interrogation", 10.0, 30),
    ("test", "Devoir", 20.0, 60),
    ("midterm", "Composition", 40.0, 90),
    ("final", "Examen", 100.0, 120),
];

const MESSAGE_TEMPLATES: [(&str, &str); 8] = [
    ("Réunion parents-professeurs", "La réunion trimestrielle aura lieu samedi à 9h en salle polyvalente."),
    ("Rappel frais de scolarité", "Merci de régulariser le solde du trimestre avant la date limite."),
    ("Fermeture exceptionnelle", "L'établissement sera fermé lundi pour travaux d'entretien."),
    ("Calendrier des compositions", "Le calendrier des compositions est disponible au secrétariat."),
    ("Sortie pédagogique", "Une sortie au musée est prévue; l'autorisation parentale est requise."),
    ("Conseil de classe", "Les conseils de classe se tiendront la semaine prochaine."),
    ("Vaccination", "Une campagne de vaccination aura lieu à l'infirmerie de l'école."),
    ("Kermesse de fin d'année", "Venez nombreux à la kermesse, stands et spectacles au programme."),
];

const SENDERS: [&str; 4] = ["Direction", "Secrétariat", "Vie scolaire", "Comptabilité"];

/// Reference "today" for exam statuses. Fixed so generation never reads the clock.
pub fn school_today() -> NaiveDate {
    ymd(2025, 3, 11)
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

pub fn add_days(date: NaiveDate, n: u64) -> NaiveDate {
    date.checked_add_days(Days::new(n)).unwrap_or(date)
}

fn phone(n: usize) -> String {
    format!(
        "+225 07 {:02} {:02} {:02}",
        (n * 13 + 7) % 100,
        (n * 29 + 3) % 100,
        (n * 31 + 11) % 100
    )
}

fn mail_local(first: &str, last: &str) -> String {
    let clean = |s: &str| {
        ascii_fold(s)
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
    };
    format!("{}.{}", clean(first), clean(last))
}

fn first_name(gender: &str, idx: usize) -> &'static str {
    if gender == "female" {
        FEMALE_FIRST[idx % FEMALE_FIRST.len()]
    } else {
        MALE_FIRST[idx % MALE_FIRST.len()]
    }
}

fn subjects() -> Vec<Subject> {
    SUBJECT_ROWS
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let dept_idx = DEPARTMENTS
                .iter()
                .position(|d| *d == row.department)
                .unwrap_or(0);
            let nth_in_dept = SUBJECT_ROWS[..i]
                .iter()
                .filter(|r| r.department == row.department)
                .count();
            let teacher_idx = dept_idx + 5 * (nth_in_dept % 6);
            Subject {
                id: format!("SU-{:03}", i + 1),
                code: row.code.to_string(),
                name: row.name.to_string(),
                department: row.department.to_string(),
                coefficient: row.coefficient,
                weekly_hours: row.weekly_hours,
                classes: CLASSES[row.from_class..].iter().map(|c| c.to_string()).collect(),
                teacher_id: format!("PR-{:03}", teacher_idx + 1),
                status: row.status.to_string(),
            }
        })
        .collect()
}

fn teachers() -> Vec<Teacher> {
    (0..30usize)
        .map(|i| {
            let department = DEPARTMENTS[i % DEPARTMENTS.len()];
            let gender = if (i * 3) % 2 == 0 { "female" } else { "male" };
            let first = first_name(gender, i * 5 + 2);
            let last = LAST_NAMES[(i * 7 + 3) % LAST_NAMES.len()];

            let mut class_idx = vec![(i * 2) % 9, (i * 2 + 4) % 9];
            if i % 3 == 0 {
                class_idx.push((i * 2 + 7) % 9);
            }
            class_idx.sort_unstable();

            let status = if i % 11 == 5 {
                "on_leave"
            } else if i % 13 == 12 {
                "suspended"
            } else {
                "active"
            };
            let contract = ["permanent", "permanent", "contract", "substitute"][i % 4];

            let mut teacher = Teacher {
                id: format!("PR-{:03}", i + 1),
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: format!("{}@schooldesk.test", mail_local(first, last).to_ascii_lowercase()),
                phone: phone(i + 300),
                department: department.to_string(),
                subjects: SUBJECT_ROWS
                    .iter()
                    .filter(|r| r.department == department)
                    .map(|r| r.code.to_string())
                    .collect(),
                classes: class_idx.iter().map(|c| CLASSES[*c].to_string()).collect(),
                status: status.to_string(),
                contract: contract.to_string(),
                hired_on: ymd(
                    2008 + ((i * 3) % 17) as i32,
                    1 + ((i * 5) % 12) as u32,
                    1 + ((i * 7) % 28) as u32,
                ),
                rating: None,
            };
            teacher.rating = derived::teacher_rating(&derived::teacher_evaluations(&teacher));
            teacher
        })
        .collect()
}

fn students(subjects: &[Subject]) -> Vec<Student> {
    (0..120usize)
        .map(|i| {
            let p = i * 2 / 3;
            let gender = if (i * 7 + p) % 2 == 0 { "female" } else { "male" };
            let first = first_name(gender, i * 5 + p);
            let last = LAST_NAMES[p % LAST_NAMES.len()];
            let class_idx = (i * 4 + p) % CLASSES.len();
            let status = if (i + 1) % 17 == 0 {
                "suspended"
            } else if (i + 1) % 23 == 0 {
                "transferred"
            } else {
                "active"
            };
            let fee_status = match (i * 7) % 10 {
                0..=5 => "paid",
                6 | 7 => "partial",
                _ => "unpaid",
            };

            let mut student = Student {
                id: format!("ST-{:03}", i + 1),
                first_name: first.to_string(),
                last_name: last.to_string(),
                gender: gender.to_string(),
                class_name: CLASSES[class_idx].to_string(),
                birth_date: ymd(
                    2021 - class_idx as i32,
                    1 + ((i * 5) % 12) as u32,
                    1 + ((i * 11) % 28) as u32,
                ),
                email: format!(
                    "{}{}@eleves.schooldesk.test",
                    mail_local(first, last).to_ascii_lowercase(),
                    i + 1
                ),
                phone: phone(i),
                status: status.to_string(),
                fee_status: fee_status.to_string(),
                parent_id: format!("PA-{:03}", p + 1),
                enrolled_on: ymd(2024 - (class_idx % 4) as i32, 9, 2),
                average: None,
            };
            student.average = derived::student_average(&derived::student_grades(&student, subjects));
            student
        })
        .collect()
}

fn parents(students: &[Student]) -> Vec<Parent> {
    (0..80usize)
        .map(|p| {
            let relation = match p % 5 {
                0 | 1 => "mother",
                2 | 3 => "father",
                _ => "guardian",
            };
            let gender = match relation {
                "mother" => "female",
                "father" => "male",
                _ if p % 2 == 0 => "female",
                _ => "male",
            };
            let first = first_name(gender, p * 7 + 3);
            let last = LAST_NAMES[p % LAST_NAMES.len()];
            let id = format!("PA-{:03}", p + 1);
            let children = students
                .iter()
                .filter(|s| s.parent_id == id)
                .map(|s| ChildLink {
                    student_id: s.id.clone(),
                    name: format!("{} {}", s.first_name, s.last_name),
                    class_name: s.class_name.clone(),
                })
                .collect();
            Parent {
                id,
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: format!(
                    "{}{}@mail.test",
                    mail_local(first, last).to_ascii_lowercase(),
                    p + 1
                ),
                phone: phone(p + 500),
                address: format!(
                    "{} {}, {}",
                    10 + (p * 37) % 190,
                    STREETS[p % STREETS.len()],
                    DISTRICTS[p % DISTRICTS.len()]
                ),
                relation: relation.to_string(),
                profession: PROFESSIONS[(p * 3) % PROFESSIONS.len()].to_string(),
                status: if p % 9 == 8 { "inactive" } else { "active" }.to_string(),
                engagement_score: ((p * 37 + 11) % 101) as u8,
                children,
            }
        })
        .collect()
}

fn exams(subjects: &[Subject], students: &[Student]) -> Vec<Exam> {
    let today = school_today();
    (0..60usize)
        .filter_map(|i| {
            let subject = subjects.get(i % subjects.len())?;
            let class_name = subject.classes.get((i / 12 + i) % subject.classes.len().max(1))?;
            let (exam_type, prefix, max_score, duration) = EXAM_TYPES[i % EXAM_TYPES.len()];
            let date = add_days(ymd(2024, 9, 16), (i * 4) as u64);
            let status = if i % 15 == 7 {
                "cancelled"
            } else if date < today {
                "completed"
            } else if date == today {
                "ongoing"
            } else {
                "scheduled"
            };
            let mut exam = Exam {
                id: format!("EX-{:03}", i + 1),
                title: format!("{} de {}", prefix, subject.name),
                subject_code: subject.code.clone(),
                class_name: class_name.clone(),
                exam_type: exam_type.to_string(),
                date,
                duration_minutes: duration,
                max_score,
                room: format!("Salle {}", 1 + i % 8),
                status: status.to_string(),
                average: None,
            };
            let results = derived::exam_results(&exam, students, &GradingRules::default());
            exam.average = derived::exam_average(&results);
            Some(exam)
        })
        .collect()
}

fn messages(students: &[Student], teachers: &[Teacher], parents: &[Parent]) -> Vec<Message> {
    (0..40usize)
        .map(|i| {
            let (title, body) = MESSAGE_TEMPLATES[i % MESSAGE_TEMPLATES.len()];
            let audience = AUDIENCES[i % AUDIENCES.len()];
            let status = if i % 10 == 9 {
                "failed"
            } else if i % 7 == 6 {
                "draft"
            } else if i % 8 == 3 {
                "scheduled"
            } else {
                "sent"
            };
            let recipients = match audience {
                "everyone" => students.len() + teachers.len() + parents.len(),
                "parents" => parents.len(),
                "teachers" => teachers.len(),
                "students" => students.len(),
                _ => {
                    let class_name = CLASSES[i % CLASSES.len()];
                    students.iter().filter(|s| s.class_name == class_name).count()
                }
            } as u32;
            let read_count = if status == "sent" {
                recipients * (35 + ((i * 17) % 60) as u32) / 100
            } else {
                0
            };
            Message {
                id: format!("MS-{:03}", i + 1),
                title: title.to_string(),
                body: body.to_string(),
                sender: SENDERS[i % SENDERS.len()].to_string(),
                audience: audience.to_string(),
                channel: CHANNELS[(i * 2) % CHANNELS.len()].to_string(),
                status: status.to_string(),
                sent_on: add_days(ymd(2024, 9, 2), (i * 5) as u64),
                recipients,
                read_count,
            }
        })
        .collect()
}

pub fn generate() -> MockStore {
    let subjects = subjects();
    let teachers = teachers();
    let students = students(&subjects);
    let parents = parents(&students);
    let exams = exams(&subjects, &students);
    let messages = messages(&students, &teachers, &parents);
    MockStore {
        students,
        teachers,
        parents,
        exams,
        subjects,
        messages,
    }
}
