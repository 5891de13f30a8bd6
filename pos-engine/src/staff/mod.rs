//! Staff roster

use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_text,
    validate_required_text,
};
use shared::error::{AppError, ErrorCode};
use shared::models::{StaffCreate, StaffMember, StaffRole, StaffUpdate};
use shared::util::{now_millis, snowflake_id};
use thiserror::Error;

/// Staff errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StaffError {
    #[error("Staff member not found: {0}")]
    NotFound(i64),

    #[error("Email {0} is already registered")]
    EmailExists(String),

    #[error("{0}")]
    Invalid(String),
}

impl From<StaffError> for AppError {
    fn from(err: StaffError) -> Self {
        let code = match &err {
            StaffError::NotFound(_) => ErrorCode::StaffNotFound,
            StaffError::EmailExists(_) => ErrorCode::StaffEmailExists,
            StaffError::Invalid(_) => ErrorCode::ValidationFailed,
        };
        AppError::with_message(code, err.to_string())
    }
}

impl From<AppError> for StaffError {
    fn from(err: AppError) -> Self {
        StaffError::Invalid(err.message)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, Default)]
pub struct StaffRoster {
    members: Vec<StaffMember>,
}

impl StaffRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hire(&mut self, payload: StaffCreate) -> Result<i64, StaffError> {
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        validate_email(&payload.email)?;
        validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        let email = normalize_email(&payload.email);
        self.ensure_email_free(&email, None)?;

        let id = snowflake_id();
        tracing::info!(staff_id = id, role = ?payload.role, "Staff member hired");
        self.members.push(StaffMember {
            id,
            name: payload.name.trim().to_string(),
            role: payload.role,
            email,
            phone: payload.phone,
            active: true,
            hired_at: now_millis(),
        });
        Ok(id)
    }

    pub fn update(&mut self, id: i64, update: StaffUpdate) -> Result<&StaffMember, StaffError> {
        if let Some(name) = &update.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        validate_optional_text(&update.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        let email = match &update.email {
            Some(email) => {
                validate_email(email)?;
                let email = normalize_email(email);
                self.ensure_email_free(&email, Some(id))?;
                Some(email)
            }
            None => None,
        };

        let member = self.get_mut(id)?;
        if let Some(name) = update.name {
            member.name = name.trim().to_string();
        }
        if let Some(role) = update.role {
            member.role = role;
        }
        if let Some(email) = email {
            member.email = email;
        }
        if update.phone.is_some() {
            member.phone = update.phone;
        }
        Ok(&*member)
    }

    /// Activate or deactivate a member (members are never deleted)
    pub fn set_active(&mut self, id: i64, active: bool) -> Result<(), StaffError> {
        let member = self.get_mut(id)?;
        member.active = active;
        tracing::info!(staff_id = id, active, "Staff member status changed");
        Ok(())
    }

    pub fn get(&self, id: i64) -> Option<&StaffMember> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn members(&self) -> &[StaffMember] {
        &self.members
    }

    pub fn by_role(&self, role: StaffRole) -> Vec<&StaffMember> {
        self.members.iter().filter(|m| m.role == role).collect()
    }

    pub fn active(&self) -> Vec<&StaffMember> {
        self.members.iter().filter(|m| m.active).collect()
    }

    /// Case-insensitive search on name and email
    pub fn search(&self, query: &str) -> Vec<&StaffMember> {
        let needle = query.trim().to_lowercase();
        self.members
            .iter()
            .filter(|m| m.name.to_lowercase().contains(&needle) || m.email.contains(&needle))
            .collect()
    }

    fn ensure_email_free(&self, email: &str, except: Option<i64>) -> Result<(), StaffError> {
        if self
            .members
            .iter()
            .any(|m| m.email == email && Some(m.id) != except)
        {
            return Err(StaffError::EmailExists(email.to_string()));
        }
        Ok(())
    }

    fn get_mut(&mut self, id: i64) -> Result<&mut StaffMember, StaffError> {
        self.members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StaffError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hire(roster: &mut StaffRoster, name: &str, email: &str, role: StaffRole) -> i64 {
        roster
            .hire(StaffCreate {
                name: name.to_string(),
                role,
                email: email.to_string(),
                phone: None,
            })
            .unwrap()
    }

    #[test]
    fn test_hire_and_filter() {
        let mut roster = StaffRoster::new();
        let ana = hire(&mut roster, "Ana López", "Ana@Restaurant.mx", StaffRole::Waiter);
        hire(&mut roster, "Beto", "beto@restaurant.mx", StaffRole::Cook);
        hire(&mut roster, "Carla", "carla@restaurant.mx", StaffRole::Waiter);

        assert_eq!(roster.get(ana).unwrap().email, "ana@restaurant.mx");
        assert_eq!(roster.by_role(StaffRole::Waiter).len(), 2);
        assert_eq!(roster.active().len(), 3);

        roster.set_active(ana, false).unwrap();
        assert_eq!(roster.active().len(), 2);
        assert_eq!(roster.members().len(), 3);
    }

    #[test]
    fn test_hire_validation() {
        let mut roster = StaffRoster::new();
        let bad_email = roster.hire(StaffCreate {
            name: "Dani".into(),
            role: StaffRole::Cashier,
            email: "dani.restaurant.mx".into(),
            phone: None,
        });
        assert!(matches!(bad_email, Err(StaffError::Invalid(_))));

        let no_name = roster.hire(StaffCreate {
            name: " ".into(),
            role: StaffRole::Cashier,
            email: "dani@restaurant.mx".into(),
            phone: None,
        });
        assert!(matches!(no_name, Err(StaffError::Invalid(_))));
        assert!(roster.members().is_empty());
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let mut roster = StaffRoster::new();
        hire(&mut roster, "Ana", "ana@restaurant.mx", StaffRole::Waiter);
        let err = roster
            .hire(StaffCreate {
                name: "Ana B".into(),
                role: StaffRole::Cook,
                email: " ANA@restaurant.mx ".into(),
                phone: None,
            })
            .unwrap_err();
        assert_eq!(err, StaffError::EmailExists("ana@restaurant.mx".into()));
        assert_eq!(AppError::from(err).code, ErrorCode::StaffEmailExists);
    }

    #[test]
    fn test_update() {
        let mut roster = StaffRoster::new();
        let ana = hire(&mut roster, "Ana", "ana@restaurant.mx", StaffRole::Waiter);
        let beto = hire(&mut roster, "Beto", "beto@restaurant.mx", StaffRole::Cook);

        let updated = roster
            .update(
                ana,
                StaffUpdate {
                    role: Some(StaffRole::Manager),
                    phone: Some("55 1234 5678".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.role, StaffRole::Manager);
        assert_eq!(updated.name, "Ana");

        // Keeping one's own email is fine, taking someone else's is not
        assert!(
            roster
                .update(
                    ana,
                    StaffUpdate {
                        email: Some("ana@restaurant.mx".into()),
                        ..Default::default()
                    }
                )
                .is_ok()
        );
        assert!(matches!(
            roster.update(
                beto,
                StaffUpdate {
                    email: Some("ana@restaurant.mx".into()),
                    ..Default::default()
                }
            ),
            Err(StaffError::EmailExists(_))
        ));
        assert!(matches!(
            roster.update(1, StaffUpdate::default()),
            Err(StaffError::NotFound(1))
        ));
    }

    #[test]
    fn test_search() {
        let mut roster = StaffRoster::new();
        hire(&mut roster, "Ana López", "ana@restaurant.mx", StaffRole::Waiter);
        hire(&mut roster, "Beto", "beto@restaurant.mx", StaffRole::Cook);
        assert_eq!(roster.search("lópez").len(), 1);
        assert_eq!(roster.search("BETO@").len(), 1);
    }
}
