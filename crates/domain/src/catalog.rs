//! Service catalog: services, sub-services and the questions each asks.
//!
//! Every leaf of the catalog (a service without sub-services, or a
//! sub-service) is a *branch* and owns an ordered question list. Branches
//! are addressed with the typed [`BranchKey`] so a service key and a
//! sub-service key can never be confused.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::status::{StatusCatalog, StatusDef};

/// Longest key accepted, so encoded button payloads stay short.
pub const MAX_KEY_LEN: usize = 40;

pub(crate) fn check_key(key: &str) -> Result<(), CatalogError> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(CatalogError::InvalidKey(key.to_string()))
    }
}

/// A single scripted question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Key the answer is stored under.
    pub key: String,
    pub text: String,
}

impl Question {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubServiceDef {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDef {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub sub_services: Vec<SubServiceDef>,
}

impl ServiceDef {
    pub fn has_sub_services(&self) -> bool {
        !self.sub_services.is_empty()
    }

    pub fn sub_service(&self, key: &str) -> Option<&SubServiceDef> {
        self.sub_services.iter().find(|sub| sub.key == key)
    }
}

/// Identifies which question list applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BranchKey {
    /// A service without sub-services.
    Service { service: String },

    /// A sub-service, scoped to its parent service.
    SubService { service: String, sub_service: String },
}

impl BranchKey {
    pub fn service(service: impl Into<String>) -> Self {
        BranchKey::Service {
            service: service.into(),
        }
    }

    pub fn sub_service(service: impl Into<String>, sub_service: impl Into<String>) -> Self {
        BranchKey::SubService {
            service: service.into(),
            sub_service: sub_service.into(),
        }
    }

    pub fn service_key(&self) -> &str {
        match self {
            BranchKey::Service { service } | BranchKey::SubService { service, .. } => service,
        }
    }

    pub fn sub_service_key(&self) -> Option<&str> {
        match self {
            BranchKey::Service { .. } => None,
            BranchKey::SubService { sub_service, .. } => Some(sub_service),
        }
    }

    /// Key of the leaf itself (the sub-service key when there is one).
    pub fn leaf_key(&self) -> &str {
        self.sub_service_key().unwrap_or(self.service_key())
    }
}

impl std::fmt::Display for BranchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BranchKey::Service { service } => write!(f, "{service}"),
            BranchKey::SubService {
                service,
                sub_service,
            } => write!(f, "{service}/{sub_service}"),
        }
    }
}

/// Read-only catalog of services and their question lists.
///
/// Lookups are total: unknown keys yield `None`, because keys arrive from
/// button payloads that may be stale or forged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCatalog {
    services: Vec<ServiceDef>,
    questions: HashMap<BranchKey, Vec<Question>>,
}

impl ServiceCatalog {
    /// Builds and validates a catalog.
    pub fn new(
        services: Vec<ServiceDef>,
        questions: HashMap<BranchKey, Vec<Question>>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self::from_parts(services, questions);
        catalog.validate()?;
        Ok(catalog)
    }

    /// Builds a catalog without validation.
    ///
    /// A catalog built this way may have leaves without questions; the
    /// conversation engine then aborts those dialogues instead of crashing.
    pub fn from_parts(
        services: Vec<ServiceDef>,
        questions: HashMap<BranchKey, Vec<Question>>,
    ) -> Self {
        Self {
            services,
            questions,
        }
    }

    /// Checks keys and that every reachable leaf has at least one question.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.services.is_empty() {
            return Err(CatalogError::NoServices);
        }

        let mut service_keys = HashSet::new();
        let mut sub_keys = HashSet::new();
        for service in &self.services {
            check_key(&service.key)?;
            if !service_keys.insert(service.key.as_str()) {
                return Err(CatalogError::DuplicateKey(service.key.clone()));
            }
            for sub in &service.sub_services {
                check_key(&sub.key)?;
                if !sub_keys.insert(sub.key.as_str()) {
                    return Err(CatalogError::DuplicateKey(sub.key.clone()));
                }
            }
        }
        if let Some(key) = service_keys.intersection(&sub_keys).next() {
            return Err(CatalogError::AmbiguousKey(key.to_string()));
        }

        for branch in self.branches() {
            let answered = self.questions.get(&branch).is_some_and(|q| !q.is_empty());
            if !answered {
                return Err(CatalogError::MissingQuestions(branch.to_string()));
            }
            let mut question_keys = HashSet::new();
            for question in &self.questions[&branch] {
                check_key(&question.key)?;
                if !question_keys.insert(question.key.as_str()) {
                    return Err(CatalogError::DuplicateKey(question.key.clone()));
                }
            }
        }

        if let Some(orphan) = self.questions.keys().find(|key| !self.is_leaf(key)) {
            return Err(CatalogError::UnknownBranch(orphan.to_string()));
        }

        Ok(())
    }

    /// Every leaf branch, in catalog order.
    pub fn branches(&self) -> Vec<BranchKey> {
        let mut branches = Vec::new();
        for service in &self.services {
            if service.has_sub_services() {
                for sub in &service.sub_services {
                    branches.push(BranchKey::sub_service(&service.key, &sub.key));
                }
            } else {
                branches.push(BranchKey::service(&service.key));
            }
        }
        branches
    }

    fn is_leaf(&self, branch: &BranchKey) -> bool {
        match branch {
            BranchKey::Service { service } => self
                .service(service)
                .is_some_and(|def| !def.has_sub_services()),
            BranchKey::SubService {
                service,
                sub_service,
            } => self.sub_service(service, sub_service).is_some(),
        }
    }

    pub fn services(&self) -> &[ServiceDef] {
        &self.services
    }

    pub fn service(&self, key: &str) -> Option<&ServiceDef> {
        self.services.iter().find(|service| service.key == key)
    }

    pub fn sub_service(&self, service: &str, sub_service: &str) -> Option<&SubServiceDef> {
        self.service(service)?.sub_service(sub_service)
    }

    /// Questions for `branch`, or `None` if the branch is unknown or empty.
    pub fn questions(&self, branch: &BranchKey) -> Option<&[Question]> {
        self.questions
            .get(branch)
            .map(Vec::as_slice)
            .filter(|questions| !questions.is_empty())
    }

    /// The catalog shipped with the bot.
    pub fn builtin() -> Self {
        let sub = |key: &str, label: &str| SubServiceDef {
            key: key.to_string(),
            label: label.to_string(),
        };
        let service = |key: &str, label: &str, subs: Vec<SubServiceDef>| ServiceDef {
            key: key.to_string(),
            label: label.to_string(),
            sub_services: subs,
        };

        let services = vec![
            service(
                "person_check",
                "👤 Background check",
                vec![
                    sub("basic_dossier", "📄 Basic dossier"),
                    sub("advanced_dossier", "📑 Advanced dossier"),
                    sub("full_dossier", "📁 Full dossier"),
                    sub("consultation", "❓ Not sure, I need advice"),
                ],
            ),
            service("due_diligence", "👥 Counterparty check", vec![]),
            service("private_investigation", "🔎 Private investigation", vec![]),
            service("other", "Other", vec![]),
        ];

        let contact = Question::new(
            "contact_info",
            "Where can we reach you? By default we reply in this chat; \
             you may leave another handle or an email.",
        );
        let dossier = |current_info: &str| {
            vec![
                Question::new(
                    "whos_target",
                    "Who or what should we collect information about (no names)?",
                ),
                Question::new("objective", "What is the main goal of your request?"),
                Question::new("current_info", current_info),
                Question::new("budget_timeline", "Do you have a budget and a deadline?"),
                contact.clone(),
            ]
        };

        let mut questions = HashMap::new();
        questions.insert(
            BranchKey::sub_service("person_check", "basic_dossier"),
            dossier("What do you already know about the subject?"),
        );
        questions.insert(
            BranchKey::sub_service("person_check", "advanced_dossier"),
            dossier("What do you already know about the subject or their family?"),
        );
        questions.insert(
            BranchKey::sub_service("person_check", "full_dossier"),
            dossier(
                "What do you already know about the subject, their family or partners?",
            ),
        );
        questions.insert(
            BranchKey::sub_service("person_check", "consultation"),
            vec![Question::new(
                "contact_info",
                "Leave a contact and we will get back to you.",
            )],
        );
        questions.insert(
            BranchKey::service("due_diligence"),
            vec![
                Question::new(
                    "company_name",
                    "Who do you want to check? (partner, counterparty, competitor...)",
                ),
                Question::new("company_details", "What do you know about them?"),
                Question::new("check_purpose", "What is the purpose of the check?"),
            ],
        );
        questions.insert(
            BranchKey::service("private_investigation"),
            vec![
                Question::new(
                    "situation_description",
                    "Describe the situation, details may be left out.",
                ),
                Question::new("main_goal", "What is the main goal of the investigation?"),
            ],
        );
        questions.insert(
            BranchKey::service("other"),
            vec![Question::new(
                "task_description",
                "Describe your task in detail.",
            )],
        );

        Self::from_parts(services, questions)
    }
}

/// On-disk catalog format.
///
/// Question lists are keyed by the bare leaf key (a service key or a
/// sub-service key); [`CatalogFile::into_catalogs`] resolves each into a
/// [`BranchKey`] and rejects keys that are ambiguous or unknown.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    pub services: Vec<ServiceDef>,
    pub questions: HashMap<String, Vec<Question>>,
    #[serde(default)]
    pub statuses: Vec<StatusDef>,
}

impl CatalogFile {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolves and validates the file into a service and a status catalog.
    ///
    /// An empty `statuses` list selects the default status set.
    pub fn into_catalogs(self) -> Result<(ServiceCatalog, StatusCatalog), CatalogError> {
        let mut questions = HashMap::new();
        for (key, list) in self.questions {
            let as_service = self.services.iter().find(|s| s.key == key);
            let as_sub: Vec<_> = self
                .services
                .iter()
                .filter(|s| s.sub_service(&key).is_some())
                .collect();

            let branch = match (as_service, as_sub.as_slice()) {
                (Some(_), []) => BranchKey::service(&key),
                (None, [parent]) => BranchKey::sub_service(&parent.key, &key),
                (None, []) => return Err(CatalogError::UnknownBranch(key)),
                _ => return Err(CatalogError::AmbiguousKey(key)),
            };
            questions.insert(branch, list);
        }

        let services = ServiceCatalog::new(self.services, questions)?;
        let statuses = if self.statuses.is_empty() {
            StatusCatalog::default()
        } else {
            StatusCatalog::new(self.statuses)?
        };
        tracing::debug!(
            services = services.services().len(),
            branches = services.branches().len(),
            "catalog loaded"
        );
        Ok((services, statuses))
    }
}
