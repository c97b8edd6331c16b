use serde::Deserialize;

use crate::actor_framework::Entity;
use crate::domain::{
    FieldError, Gender, NewUser, RemoteUser, UserStatus, ALREADY_TAKEN, CANT_BE_BLANK,
    GENDER_BLANK, IS_INVALID,
};
use crate::error::StoreError;

/// A create or update body as received, before validation.
///
/// Every field is optional so that a partial or malformed body turns into
/// field errors instead of a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserDraft {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
}

impl From<NewUser> for UserDraft {
    fn from(user: NewUser) -> Self {
        Self {
            name: Some(user.name),
            gender: Some(user.gender.to_string()),
            email: Some(user.email),
            status: Some(user.status.to_string()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|part| !part.is_empty())
        && !value.chars().any(char::is_whitespace)
}

fn check_email(value: Option<&str>, errors: &mut Vec<FieldError>) -> Option<String> {
    match non_blank(value) {
        None => {
            errors.push(FieldError::new("email", CANT_BE_BLANK));
            None
        }
        Some(email) if !looks_like_email(email) => {
            errors.push(FieldError::new("email", IS_INVALID));
            None
        }
        Some(email) => Some(email.to_string()),
    }
}

fn check_name(value: Option<&str>, errors: &mut Vec<FieldError>) -> Option<String> {
    let name = non_blank(value).map(str::to_string);
    if name.is_none() {
        errors.push(FieldError::new("name", CANT_BE_BLANK));
    }
    name
}

fn check_gender(value: Option<&str>, errors: &mut Vec<FieldError>) -> Option<Gender> {
    let gender = non_blank(value).and_then(Gender::parse);
    if gender.is_none() {
        errors.push(FieldError::new("gender", GENDER_BLANK));
    }
    gender
}

fn check_status(value: Option<&str>, errors: &mut Vec<FieldError>) -> Option<UserStatus> {
    let status = non_blank(value).and_then(UserStatus::parse);
    if status.is_none() {
        errors.push(FieldError::new("status", CANT_BE_BLANK));
    }
    status
}

impl Entity for RemoteUser {
    type Id = u64;
    type CreatePayload = UserDraft;
    type Patch = UserDraft;

    fn id(&self) -> &u64 {
        &self.id
    }

    /// Errors come back in the order email, name, gender, status.
    fn from_create(id: u64, draft: UserDraft) -> Result<Self, StoreError> {
        let mut errors = Vec::new();
        let email = check_email(draft.email.as_deref(), &mut errors);
        let name = check_name(draft.name.as_deref(), &mut errors);
        let gender = check_gender(draft.gender.as_deref(), &mut errors);
        let status = check_status(draft.status.as_deref(), &mut errors);

        match (email, name, gender, status) {
            (Some(email), Some(name), Some(gender), Some(status)) => Ok(Self {
                id,
                fields: NewUser {
                    name,
                    gender,
                    email,
                    status,
                },
            }),
            _ => Err(StoreError::Invalid(errors)),
        }
    }

    /// Only the supplied fields are validated and applied. Nothing changes if
    /// any of them is invalid.
    fn on_update(&mut self, patch: UserDraft) -> Result<(), StoreError> {
        let mut errors = Vec::new();
        let email = patch
            .email
            .as_deref()
            .map(|v| check_email(Some(v), &mut errors));
        let name = patch
            .name
            .as_deref()
            .map(|v| check_name(Some(v), &mut errors));
        let gender = patch
            .gender
            .as_deref()
            .map(|v| check_gender(Some(v), &mut errors));
        let status = patch
            .status
            .as_deref()
            .map(|v| check_status(Some(v), &mut errors));

        if !errors.is_empty() {
            return Err(StoreError::Invalid(errors));
        }
        if let Some(Some(email)) = email {
            self.fields.email = email;
        }
        if let Some(Some(name)) = name {
            self.fields.name = name;
        }
        if let Some(Some(gender)) = gender {
            self.fields.gender = gender;
        }
        if let Some(Some(status)) = status {
            self.fields.status = status;
        }
        Ok(())
    }

    fn conflicts(&self, other: &Self) -> Vec<FieldError> {
        if self.fields.email.eq_ignore_ascii_case(&other.fields.email) {
            vec![FieldError::new("email", ALREADY_TAKEN)]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: Option<&str>, gender: Option<&str>, email: Option<&str>, status: Option<&str>) -> UserDraft {
        UserDraft {
            name: name.map(String::from),
            gender: gender.map(String::from),
            email: email.map(String::from),
            status: status.map(String::from),
        }
    }

    fn invalid_fields(result: Result<RemoteUser, StoreError>) -> Vec<(String, String)> {
        match result {
            Err(StoreError::Invalid(errors)) => {
                errors.into_iter().map(|e| (e.field, e.message)).collect()
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_name_only_body_reports_remaining_fields_in_order() {
        let fields = invalid_fields(RemoteUser::from_create(1, draft(Some("test"), None, None, None)));
        assert_eq!(
            fields,
            vec![
                ("email".to_string(), CANT_BE_BLANK.to_string()),
                ("gender".to_string(), GENDER_BLANK.to_string()),
                ("status".to_string(), CANT_BE_BLANK.to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_enum_values_are_rejected() {
        let fields = invalid_fields(RemoteUser::from_create(
            1,
            draft(Some("A B"), Some("other"), Some("a.b@x.io"), Some("pending")),
        ));
        assert_eq!(
            fields,
            vec![
                ("gender".to_string(), GENDER_BLANK.to_string()),
                ("status".to_string(), CANT_BE_BLANK.to_string()),
            ]
        );
    }

    #[test]
    fn test_valid_draft_builds_record() {
        let user = RemoteUser::from_create(
            9,
            draft(Some("Jane Doe"), Some("female"), Some("jane.doe.x7z@gmail.com"), Some("active")),
        )
        .unwrap();
        assert_eq!(user.id, 9);
        assert_eq!(user.fields.gender, Gender::Female);
    }

    #[test]
    fn test_email_format() {
        assert!(looks_like_email("jane.doe.x7z@gmail.com"));
        assert!(!looks_like_email("test"));
        assert!(!looks_like_email("@gmail.com"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("a b@c.com"));
        assert!(!looks_like_email("a@b@c.com"));
    }

    #[test]
    fn test_update_rejects_invalid_email_and_keeps_record() {
        let mut user = RemoteUser::from_create(
            3,
            draft(Some("Jane Doe"), Some("female"), Some("jane@gmail.com"), Some("active")),
        )
        .unwrap();
        let before = user.clone();

        let err = user.on_update(draft(Some("New Name"), None, Some("test"), None)).unwrap_err();
        assert_eq!(err, StoreError::Invalid(vec![FieldError::new("email", IS_INVALID)]));
        assert_eq!(user, before);

        user.on_update(draft(Some("updated name"), None, None, None)).unwrap();
        assert_eq!(user.fields.name, "updated name");
        assert_eq!(user.fields.email, "jane@gmail.com");
    }

    #[test]
    fn test_emails_conflict_case_insensitively() {
        let a = RemoteUser {
            id: 1,
            fields: NewUser::new("A", Gender::Male, "Same@Mail.com", UserStatus::Active),
        };
        let b = RemoteUser {
            id: 2,
            fields: NewUser::new("B", Gender::Female, "same@mail.com", UserStatus::Inactive),
        };
        assert_eq!(a.conflicts(&b), vec![FieldError::new("email", ALREADY_TAKEN)]);
    }
}
