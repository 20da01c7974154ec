//! Mapping raw responses to semantic outcomes.
//!
//! The backend answers every validation failure with status 400 and tells
//! the cases apart only in a structured error body: a machine-readable code
//! plus, per field path, a list of localized messages. "Already exists" and
//! "not found" are recognized by phrase matching against a configurable
//! [`ErrorPhrases`] table.

use super::HttpResponse;
use serde::Deserialize;
use std::collections::HashMap;

/// Predicates over a response, asked in a fixed order by the REST client.
pub trait ErrorClassifier: Send + Sync {
    fn is_not_authenticated(&self, response: &HttpResponse) -> bool;
    fn is_invalid_request(&self, response: &HttpResponse) -> bool;
    fn is_already_exists(&self, response: &HttpResponse) -> bool;
    fn is_not_found(&self, response: &HttpResponse) -> bool;
    fn is_ok(&self, response: &HttpResponse) -> bool;
    fn is_server_error(&self, response: &HttpResponse) -> bool;
}

/// Locale phrases recognized in validation messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPhrases {
    pub already_exists: Vec<String>,
    pub not_found: Vec<String>,
}

impl Default for ErrorPhrases {
    fn default() -> Self {
        Self {
            already_exists: ["すでに登録されています", "already exists", "已存在"]
                .map(String::from)
                .to_vec(),
            not_found: ["見つかりません", "not found", "未找到指定的", "未找到相應的"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl ErrorPhrases {
    /// Built-in phrases extended with extra ones.
    pub fn with_extra(already_exists: &[String], not_found: &[String]) -> Self {
        let mut phrases = Self::default();
        phrases.already_exists.extend(already_exists.iter().cloned());
        phrases.not_found.extend(not_found.iter().cloned());
        phrases
    }
}

const INVALID_CREDENTIAL: &str = "CB_WA01";
const NO_AUTH_HEADER: &str = "CB_AU01";
const VALIDATION_ERROR: &str = "CB_VA01";

/// Field paths whose messages identify the addressed record.
const CODE_FIELDS: [&str; 3] = ["users.code", "groups.code", "organizations.code"];

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    errors: HashMap<String, FieldErrors>,
}

#[derive(Debug, Default, Deserialize)]
struct FieldErrors {
    #[serde(default)]
    messages: Vec<String>,
}

impl ErrorBody {
    fn parse(response: &HttpResponse) -> Option<Self> {
        serde_json::from_str(&response.body).ok()
    }

    fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }

    /// Whether the first code field present carries one of the phrases.
    fn code_field_mentions(&self, phrases: &[String]) -> bool {
        CODE_FIELDS
            .iter()
            .find_map(|field| self.errors.get(*field))
            .is_some_and(|errors| {
                errors
                    .messages
                    .iter()
                    .any(|m| phrases.iter().any(|p| m.contains(p.as_str())))
            })
    }
}

/// Classifier for the kintone user API.
#[derive(Debug, Clone, Default)]
pub struct KintoneErrorClassifier {
    phrases: ErrorPhrases,
}

impl KintoneErrorClassifier {
    pub fn new(phrases: ErrorPhrases) -> Self {
        Self { phrases }
    }

    pub fn phrases(&self) -> &ErrorPhrases {
        &self.phrases
    }

    fn validation_mentions(&self, response: &HttpResponse, phrases: &[String]) -> bool {
        if response.status != 400 {
            return false;
        }
        ErrorBody::parse(response).is_some_and(|body| {
            body.has_code(VALIDATION_ERROR) && body.code_field_mentions(phrases)
        })
    }
}

impl ErrorClassifier for KintoneErrorClassifier {
    fn is_not_authenticated(&self, response: &HttpResponse) -> bool {
        match response.status {
            401 => true,
            520 => ErrorBody::parse(response).is_some_and(|body| {
                body.has_code(INVALID_CREDENTIAL) || body.has_code(NO_AUTH_HEADER)
            }),
            _ => false,
        }
    }

    /// A 400 that is neither a conflict nor a missing target.
    fn is_invalid_request(&self, response: &HttpResponse) -> bool {
        response.status == 400 && !self.is_already_exists(response) && !self.is_not_found(response)
    }

    fn is_already_exists(&self, response: &HttpResponse) -> bool {
        self.validation_mentions(response, &self.phrases.already_exists)
    }

    fn is_not_found(&self, response: &HttpResponse) -> bool {
        self.validation_mentions(response, &self.phrases.not_found)
    }

    fn is_ok(&self, response: &HttpResponse) -> bool {
        matches!(response.status, 200 | 204)
    }

    fn is_server_error(&self, response: &HttpResponse) -> bool {
        (500..=599).contains(&response.status)
    }
}
