use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::shared::validation::{validate_consent, validate_png_data_url};

/// Handwritten signature with the identity data captured alongside it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Signature {
    /// `data:image/png;base64,...`
    #[validate(custom(function = "validate_png_data_url"))]
    pub image_data_url: String,

    #[validate(length(min = 1, max = 200, message = "Signer name is required"))]
    pub signer_name: String,

    #[validate(length(min = 1, max = 200, message = "Place of signature is required"))]
    pub place: String,

    pub signed_at: DateTime<Utc>,

    #[validate(custom(function = "validate_consent"))]
    pub consent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SignatureParty {
    Bailleur,
    Locataire,
}

impl SignatureParty {
    pub fn column(&self) -> &'static str {
        match self {
            SignatureParty::Bailleur => "signature_bailleur",
            SignatureParty::Locataire => "signature_locataire",
        }
    }
}

impl std::fmt::Display for SignatureParty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignatureParty::Bailleur => write!(f, "bailleur"),
            SignatureParty::Locataire => write!(f, "locataire"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::tiny_png_data_url;

    fn signature() -> Signature {
        Signature {
            image_data_url: tiny_png_data_url(),
            signer_name: "Marie Dupont".to_string(),
            place: "Lyon".to_string(),
            signed_at: Utc::now(),
            consent: true,
        }
    }

    #[test]
    fn test_valid_signature() {
        assert!(signature().validate().is_ok());
    }

    #[test]
    fn test_signature_requires_consent_and_png() {
        let mut sig = signature();
        sig.consent = false;
        let errors = sig.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("consent"));

        let mut sig = signature();
        sig.image_data_url = "data:image/jpeg;base64,/9j/4AAQ".to_string();
        let errors = sig.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("image_data_url"));
    }
}
