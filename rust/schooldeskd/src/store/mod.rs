mod entities;
mod seed;

pub use entities::{ChildLink, Exam, Message, Parent, Student, Subject, Teacher};
pub use seed::{add_days, school_today, ymd, CLASSES, DEPARTMENTS, SUBJECT_CODES};

/// Read-only access to the school's collections.
///
/// Collections keep insertion order; that order is the implicit secondary
/// ordering of every sorted view.
pub trait EntityStore {
    fn students(&self) -> &[Student];
    fn teachers(&self) -> &[Teacher];
    fn parents(&self) -> &[Parent];
    fn exams(&self) -> &[Exam];
    fn subjects(&self) -> &[Subject];
    fn messages(&self) -> &[Message];

    fn subject_by_code(&self, code: &str) -> Option<&Subject> {
        self.subjects().iter().find(|s| s.code == code)
    }

    fn student_by_id(&self, id: &str) -> Option<&Student> {
        self.students().iter().find(|s| s.id == id)
    }

    fn class_students<'a>(&'a self, class_name: &'a str) -> Box<dyn Iterator<Item = &'a Student> + 'a> {
        Box::new(self.students().iter().filter(move |s| s.class_name == class_name))
    }
}

/// In-memory store generated once at startup.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    pub students: Vec<Student>,
    pub teachers: Vec<Teacher>,
    pub parents: Vec<Parent>,
    pub exams: Vec<Exam>,
    pub subjects: Vec<Subject>,
    pub messages: Vec<Message>,
}

impl MockStore {
    pub fn generate() -> Self {
        seed::generate()
    }
}

impl EntityStore for MockStore {
    fn students(&self) -> &[Student] {
        &self.students
    }

    fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    fn parents(&self) -> &[Parent] {
        &self.parents
    }

    fn exams(&self) -> &[Exam] {
        &self.exams
    }

    fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    fn messages(&self) -> &[Message] {
        &self.messages
    }
}
