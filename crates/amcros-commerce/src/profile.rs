//! Customer profile stored in the `users` collection.

use crate::cart::Cart;
use crate::email::Email;
use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// What a signed-in account may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// A user document: business details plus the embedded cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: Email,
    #[serde(default)]
    pub business_name: String,
    /// GST identification number.
    #[serde(default)]
    pub gstin: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub address: String,
    /// Identity provider uid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub cart: Cart,
}

impl UserProfile {
    /// Build the document written at sign-up.
    pub fn from_sign_up(email: Email, uid: impl Into<String>, details: SignUpDetails) -> Self {
        Self {
            email,
            business_name: details.business_name.trim().to_string(),
            gstin: details.gstin.trim().to_uppercase(),
            contact: String::new(),
            address: String::new(),
            uid: Some(uid.into()),
            role: Role::Customer,
            cart: Cart::new(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Name shown in greetings, falling back to the email.
    pub fn display_name(&self) -> &str {
        if self.business_name.is_empty() {
            self.email.as_str()
        } else {
            &self.business_name
        }
    }

    pub fn apply_update(&mut self, update: ProfileUpdate) {
        self.business_name = update.business_name;
        self.gstin = update.gstin;
        self.contact = update.contact;
        self.address = update.address;
    }
}

/// Business details collected on the sign-up form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SignUpDetails {
    pub business_name: String,
    pub gstin: String,
}

impl SignUpDetails {
    pub fn new(business_name: impl Into<String>, gstin: impl Into<String>) -> Self {
        Self {
            business_name: business_name.into(),
            gstin: gstin.into(),
        }
    }

    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.business_name.trim().is_empty() {
            return Err(CommerceError::ValidationError(
                "business name is required".to_string(),
            ));
        }
        validate_gstin(&self.gstin)
    }
}

/// The fields written by the edit-details screen. Sent as a partial update,
/// so the cart and role on the stored document are untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub business_name: String,
    pub gstin: String,
    pub contact: String,
    pub address: String,
}

impl ProfileUpdate {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            business_name: profile.business_name.clone(),
            gstin: profile.gstin.clone(),
            contact: profile.contact.clone(),
            address: profile.address.clone(),
        }
    }

    /// Trim every field and upper-case the GSTIN.
    pub fn normalized(self) -> Self {
        Self {
            business_name: self.business_name.trim().to_string(),
            gstin: self.gstin.trim().to_uppercase(),
            contact: self.contact.trim().to_string(),
            address: self.address.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.business_name.trim().is_empty() {
            return Err(CommerceError::ValidationError(
                "business name is required".to_string(),
            ));
        }
        validate_gstin(&self.gstin)
    }
}

/// GSTINs are 15 alphanumeric characters. An empty value is allowed so
/// unregistered buyers can still sign up.
fn validate_gstin(gstin: &str) -> Result<(), CommerceError> {
    let gstin = gstin.trim();
    if gstin.is_empty() {
        return Ok(());
    }
    if gstin.len() != 15 || !gstin.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CommerceError::ValidationError(format!(
            "GSTIN must be 15 letters or digits, got {:?}",
            gstin
        )));
    }
    Ok(())
}
