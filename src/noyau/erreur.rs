// src/noyau/erreur.rs
//
// Erreurs du noyau RPN
// --------------------
// Une seule énumération pour tout le pipeline (jetons -> RPN -> évaluation).
// Chaque variante correspond à une famille d’erreur (`ErrorKind`) ; les champs
// ne servent qu’au message affiché.

pub type RpnResult<T> = Result<T, RpnError>;

/// Famille d’erreur, sans contexte (pratique pour `match` et les tests).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedNumber,
    UnknownOperator,
    DuplicateOperator,
    InvalidOperator,
    MismatchedParentheses,
    MisplacedSeparator,
    ArityMismatch,
    StackUnderflow,
    EmptyExpression,
    Domain,
    InvalidRange,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RpnError {
    #[error("nombre invalide: '{literal}'")]
    MalformedNumber { literal: String },

    #[error("opération inconnue: '{name}'")]
    UnknownOperator { name: String },

    #[error("opération déjà enregistrée: '{name}'")]
    DuplicateOperator { name: String },

    #[error("opération '{name}' invalide: {reason}")]
    InvalidOperator { name: String, reason: String },

    #[error("parenthèses non équilibrées")]
    MismatchedParentheses,

    #[error("séparateur d’arguments mal placé")]
    MisplacedSeparator,

    #[error("'{function}' attend {expected} argument(s), {found} fourni(s)")]
    ArityMismatch {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("'{operator}' attend {needed} opérande(s), {available} disponible(s)")]
    StackUnderflow {
        operator: String,
        needed: usize,
        available: usize,
    },

    #[error("l’expression ne se réduit pas à une seule valeur ({values} sur la pile)")]
    EmptyExpression { values: usize },

    #[error("hors domaine: {message}")]
    Domain { message: String },

    #[error("intervalle invalide: {reason}")]
    InvalidRange { reason: String },
}

impl RpnError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedNumber { .. } => ErrorKind::MalformedNumber,
            Self::UnknownOperator { .. } => ErrorKind::UnknownOperator,
            Self::DuplicateOperator { .. } => ErrorKind::DuplicateOperator,
            Self::InvalidOperator { .. } => ErrorKind::InvalidOperator,
            Self::MismatchedParentheses => ErrorKind::MismatchedParentheses,
            Self::MisplacedSeparator => ErrorKind::MisplacedSeparator,
            Self::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            Self::StackUnderflow { .. } => ErrorKind::StackUnderflow,
            Self::EmptyExpression { .. } => ErrorKind::EmptyExpression,
            Self::Domain { .. } => ErrorKind::Domain,
            Self::InvalidRange { .. } => ErrorKind::InvalidRange,
        }
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownOperator { name: name.into() }
    }

    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain {
            message: message.into(),
        }
    }

    pub fn invalid_range(reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            reason: reason.into(),
        }
    }
}
