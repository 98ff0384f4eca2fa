//! Display labels for enum tags and column keys.
//!
//! Tags are locale independent and are the only values used for filtering,
//! sorting and storage. Labels exist for presentation and exports only.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    En,
}

impl Locale {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" => Some(Locale::Fr),
            "en" => Some(Locale::En),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Fr => "fr",
            Locale::En => "en",
        }
    }
}

/// Label for an enum tag. Unknown tags (class names, subject codes) label as themselves.
pub fn tag_label<'a>(locale: Locale, tag: &'a str) -> &'a str {
    let pair = match tag {
        "male" => ("Garçon", "Male"),
        "female" => ("Fille", "Female"),
        "active" => ("Actif", "Active"),
        "inactive" => ("Inactif", "Inactive"),
        "suspended" => ("Suspendu", "Suspended"),
        "transferred" => ("Transféré", "Transferred"),
        "on_leave" => ("En congé", "On leave"),
        "archived" => ("Archivé", "Archived"),
        "paid" => ("Payé", "Paid"),
        "partial" => ("Partiel", "Partial"),
        "unpaid" => ("Impayé", "Unpaid"),
        "pending" => ("En attente", "Pending"),
        "sciences" => ("Sciences", "Sciences"),
        "languages" => ("Langues", "Languages"),
        "humanities" => ("Sciences humaines", "Humanities"),
        "arts" => ("Arts", "Arts"),
        "sports" => ("Sports", "Sports"),
        "permanent" => ("Titulaire", "Permanent"),
        "contract" => ("Contractuel", "Contract"),
        "substitute" => ("Suppléant", "Substitute"),
        "father" => ("Père", "Father"),
        "mother" => ("Mère", "Mother"),
        "guardian" => ("Tuteur", "Guardian"),
        "high" => ("Élevé", "High"),
        "medium" => ("Moyen", "Medium"),
        "low" => ("Faible", "Low"),
        "quiz" => ("Interrogation", "Quiz"),
        "test" => ("Devoir", "Test"),
        "midterm" => ("Composition", "Midterm"),
        "final" => ("Examen final", "Final exam"),
        "scheduled" => ("Planifié", "Scheduled"),
        "ongoing" => ("En cours", "Ongoing"),
        "completed" => ("Terminé", "Completed"),
        "cancelled" => ("Annulé", "Cancelled"),
        "everyone" => ("Tout le monde", "Everyone"),
        "parents" => ("Parents", "Parents"),
        "teachers" => ("Enseignants", "Teachers"),
        "students" => ("Élèves", "Students"),
        "class" => ("Classe", "Class"),
        "email" => ("E-mail", "Email"),
        "sms" => ("SMS", "SMS"),
        "app" => ("Application", "App"),
        "draft" => ("Brouillon", "Draft"),
        "sent" => ("Envoyé", "Sent"),
        "failed" => ("Échec", "Failed"),
        _ => return tag,
    };
    match locale {
        Locale::Fr => pair.0,
        Locale::En => pair.1,
    }
}

/// Header label for a column, filter or sort key.
pub fn column_label<'a>(locale: Locale, key: &'a str) -> &'a str {
    let pair = match key {
        "id" => ("Identifiant", "ID"),
        "name" => ("Nom", "Name"),
        "firstName" => ("Prénom", "First name"),
        "lastName" => ("Nom de famille", "Last name"),
        "gender" => ("Sexe", "Gender"),
        "class" | "className" => ("Classe", "Class"),
        "classes" => ("Classes", "Classes"),
        "birthDate" => ("Date de naissance", "Birth date"),
        "email" => ("E-mail", "Email"),
        "phone" => ("Téléphone", "Phone"),
        "status" => ("Statut", "Status"),
        "feeStatus" => ("Frais de scolarité", "Fees"),
        "average" => ("Moyenne", "Average"),
        "department" => ("Département", "Department"),
        "contract" => ("Contrat", "Contract"),
        "subjects" => ("Matières", "Subjects"),
        "hiredOn" => ("Date d'embauche", "Hired on"),
        "rating" => ("Évaluation", "Rating"),
        "relation" => ("Lien", "Relation"),
        "address" => ("Adresse", "Address"),
        "profession" => ("Profession", "Profession"),
        "engagement" | "engagementScore" => ("Engagement", "Engagement"),
        "children" => ("Enfants", "Children"),
        "title" => ("Titre", "Title"),
        "subject" | "subjectCode" => ("Matière", "Subject"),
        "type" | "examType" => ("Type", "Type"),
        "date" => ("Date", "Date"),
        "duration" | "durationMinutes" => ("Durée (min)", "Duration (min)"),
        "maxScore" => ("Barème", "Max score"),
        "room" => ("Salle", "Room"),
        "code" => ("Code", "Code"),
        "coefficient" => ("Coefficient", "Coefficient"),
        "weeklyHours" => ("Heures / semaine", "Hours / week"),
        "teacherId" => ("Enseignant", "Teacher"),
        "sender" => ("Expéditeur", "Sender"),
        "audience" => ("Destinataires", "Audience"),
        "channel" => ("Canal", "Channel"),
        "sentOn" => ("Date d'envoi", "Sent on"),
        "recipients" => ("Nb destinataires", "Recipients"),
        "readCount" => ("Lus", "Read"),
        "readRate" => ("Taux de lecture", "Read rate"),
        _ => return key,
    };
    match locale {
        Locale::Fr => pair.0,
        Locale::En => pair.1,
    }
}

/// Default export title for a collection.
pub fn entity_title<'a>(locale: Locale, entity: &'a str) -> &'a str {
    let pair = match entity {
        "students" => ("Liste des élèves", "Students"),
        "teachers" => ("Liste des enseignants", "Teachers"),
        "parents" => ("Liste des parents", "Parents"),
        "exams" => ("Calendrier des examens", "Exams"),
        "subjects" => ("Liste des matières", "Subjects"),
        "messages" => ("Communications", "Communications"),
        _ => return entity,
    };
    match locale {
        Locale::Fr => pair.0,
        Locale::En => pair.1,
    }
}
