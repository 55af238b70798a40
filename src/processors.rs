//! Static registry of Document AI processors
//!
//! The key set is closed: [`ProcessorKind`] names every processor the app
//! knows about, so lookups through the enum cannot miss. String keys (from a
//! CLI or a request body) go through [`ProcessorRegistry::lookup`], which
//! rejects anything outside the set with [`TaskwiseError::UnknownProcessorKey`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskwiseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProcessorKind {
    Ocr,
    Layout,
    Form,
    Invoice,
    Expense,
    BankStatement,
}

impl ProcessorKind {
    pub const ALL: [ProcessorKind; 6] = [
        ProcessorKind::Ocr,
        ProcessorKind::Layout,
        ProcessorKind::Form,
        ProcessorKind::Invoice,
        ProcessorKind::Expense,
        ProcessorKind::BankStatement,
    ];

    /// Wire key, matching the serde representation
    pub const fn key(self) -> &'static str {
        match self {
            ProcessorKind::Ocr => "ocr",
            ProcessorKind::Layout => "layout",
            ProcessorKind::Form => "form",
            ProcessorKind::Invoice => "invoice",
            ProcessorKind::Expense => "expense",
            ProcessorKind::BankStatement => "bankStatement",
        }
    }

    fn known_keys() -> String {
        Self::ALL.map(|k| k.key()).join(", ")
    }
}

impl fmt::Display for ProcessorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ProcessorKind {
    type Err = TaskwiseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.key() == s)
            .ok_or_else(|| TaskwiseError::UnknownProcessorKey {
                key: s.to_string(),
                known: Self::known_keys(),
            })
    }
}

/// Immutable processor table shared by every document-processing caller
#[derive(Debug)]
pub struct ProcessorRegistry {
    location: &'static str,
    ocr: &'static str,
    layout: &'static str,
    form: &'static str,
    invoice: &'static str,
    expense: &'static str,
    bank_statement: &'static str,
}

pub static REGISTRY: ProcessorRegistry = ProcessorRegistry {
    location: "us",
    ocr: "OCR_PROCESSOR_ID",
    layout: "LAYOUT_PARSER_PROCESSOR_ID",
    form: "FORM_PARSER_PROCESSOR_ID",
    invoice: "INVOICE_PARSER_PROCESSOR_ID",
    expense: "EXPENSE_PARSER_PROCESSOR_ID",
    bank_statement: "BANK_STATEMENT_PARSER_PROCESSOR_ID",
};

/// One registry row, optionally resolved against a GCP project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorEntry {
    pub key: ProcessorKind,
    pub processor_id: &'static str,
    pub location: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_url: Option<String>,
}

impl ProcessorRegistry {
    pub fn location(&self) -> &'static str {
        self.location
    }

    pub fn get(&self, kind: ProcessorKind) -> &'static str {
        match kind {
            ProcessorKind::Ocr => self.ocr,
            ProcessorKind::Layout => self.layout,
            ProcessorKind::Form => self.form,
            ProcessorKind::Invoice => self.invoice,
            ProcessorKind::Expense => self.expense,
            ProcessorKind::BankStatement => self.bank_statement,
        }
    }

    /// Resolve a string key, rejecting keys outside the closed set
    pub fn lookup(&self, key: &str) -> Result<&'static str> {
        Ok(self.get(key.parse()?))
    }

    pub fn entries(&self) -> impl Iterator<Item = (ProcessorKind, &'static str)> + '_ {
        ProcessorKind::ALL.into_iter().map(|k| (k, self.get(k)))
    }

    /// Regional API host, e.g. `https://us-documentai.googleapis.com`
    pub fn endpoint(&self) -> String {
        format!("https://{}-documentai.googleapis.com", self.location)
    }

    /// `projects/{project}/locations/{location}/processors/{id}`
    pub fn resource_name(&self, kind: ProcessorKind, project_id: &str) -> String {
        format!(
            "projects/{}/locations/{}/processors/{}",
            project_id.trim(),
            self.location,
            self.get(kind)
        )
    }

    /// Full URL of the synchronous `:process` method for a processor
    pub fn process_url(&self, kind: ProcessorKind, project_id: &str) -> String {
        format!(
            "{}/v1/{}:process",
            self.endpoint(),
            self.resource_name(kind, project_id)
        )
    }

    pub fn describe(&self, kind: ProcessorKind, project_id: Option<&str>) -> ProcessorEntry {
        let project_id = project_id.map(str::trim).filter(|p| !p.is_empty());
        ProcessorEntry {
            key: kind,
            processor_id: self.get(kind),
            location: self.location,
            resource_name: project_id.map(|p| self.resource_name(kind, p)),
            process_url: project_id.map(|p| self.process_url(kind, p)),
        }
    }
}
