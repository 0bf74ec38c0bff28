//! Operator profile records and the payload for editing them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::UserId;
use crate::validation::{ValidationError, optional};

/// A user record as returned by `GET /user/{email}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// Raw profile form fields as submitted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub photo: Option<String>,
}

/// Body for `PATCH /user/{id}`.
///
/// Carries every editable field. The email address is not one of them, so it
/// cannot be sent as a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub bio: String,
    pub photo: Option<String>,
}

impl ProfileUpdate {
    /// Build the update from a submitted form.
    ///
    /// Text fields are trimmed and blank optional fields become `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Invalid`] when a date of birth is given but
    /// is not a `YYYY-MM-DD` date. The update replaces every field, so a bad
    /// date is refused rather than sent as a cleared one.
    pub fn from_form(form: &ProfileForm) -> Result<Self, ValidationError> {
        let date_of_birth = optional(form.date_of_birth.as_deref())
            .map(|d| {
                NaiveDate::parse_from_str(&d, "%Y-%m-%d").map_err(|_| ValidationError::Invalid {
                    field: "Date of birth",
                    reason: format!("'{d}' is not a date"),
                })
            })
            .transpose()?;

        Ok(Self {
            name: form.name.trim().to_owned(),
            phone: form.phone.trim().to_owned(),
            address: form.address.trim().to_owned(),
            date_of_birth,
            gender: optional(form.gender.as_deref()),
            bio: form.bio.trim().to_owned(),
            photo: optional(form.photo.as_deref()),
        })
    }
}

impl From<&UserProfile> for ProfileUpdate {
    fn from(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            phone: profile.phone.clone(),
            address: profile.address.clone(),
            date_of_birth: profile.date_of_birth,
            gender: profile.gender.clone(),
            bio: profile.bio.clone(),
            photo: profile.photo.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> ProfileForm {
        ProfileForm {
            name: " Nadia Islam ".to_string(),
            phone: "01711111111".to_string(),
            address: "Gulshan 2, Dhaka".to_string(),
            date_of_birth: Some("1994-03-12".to_string()),
            gender: Some(String::new()),
            bio: "Store manager".to_string(),
            photo: None,
        }
    }

    #[test]
    fn test_from_form_trims_and_blanks_to_none() {
        let update = ProfileUpdate::from_form(&form()).unwrap();
        assert_eq!(update.name, "Nadia Islam");
        assert_eq!(update.date_of_birth, NaiveDate::from_ymd_opt(1994, 3, 12));
        assert_eq!(update.gender, None);
        assert_eq!(update.photo, None);
    }

    #[test]
    fn test_unparseable_date_is_refused() {
        let mut f = form();
        f.date_of_birth = Some("12/03/1994".to_string());
        assert!(matches!(
            ProfileUpdate::from_form(&f),
            Err(ValidationError::Invalid {
                field: "Date of birth",
                ..
            })
        ));
    }

    #[test]
    fn test_blank_date_clears_it() {
        let mut f = form();
        f.date_of_birth = Some("  ".to_string());
        assert_eq!(ProfileUpdate::from_form(&f).unwrap().date_of_birth, None);
    }

    #[test]
    fn test_payload_never_carries_email() {
        let value = serde_json::to_value(ProfileUpdate::from_form(&form()).unwrap()).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert!(!keys.contains(&"email"));
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(
            sorted,
            vec!["address", "bio", "dateOfBirth", "gender", "name", "phone", "photo"]
        );
    }

    #[test]
    fn test_profile_wire_format() {
        let json = r#"{
            "_id": "u1",
            "name": "Nadia",
            "email": "nadia@example.com",
            "phone": "017",
            "address": "Dhaka",
            "dateOfBirth": "1994-03-12",
            "bio": ""
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.email, "nadia@example.com");
        assert_eq!(profile.gender, None);
        let update = ProfileUpdate::from(&profile);
        assert_eq!(update.date_of_birth, NaiveDate::from_ymd_opt(1994, 3, 12));
    }
}
