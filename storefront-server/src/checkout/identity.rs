//! Identity Resolver
//!
//! Runs once at order creation and produces the single purchaser identity
//! bound to the order. Authenticated claims win: name and email come from
//! the claims, the phone from the checkout form since identity claims
//! carry no phone number. Without claims, all three guest fields are
//! required.

use super::error::{CheckoutError, CheckoutResult};
use crate::auth::CurrentUser;
use crate::db::models::Purchaser;

/// Raw contact fields from the checkout form
#[derive(Debug, Clone, Default)]
pub struct GuestContactInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Resolve the purchaser identity for a new order
pub fn resolve_purchaser(
    user: Option<&CurrentUser>,
    contact: &GuestContactInput,
) -> CheckoutResult<Purchaser> {
    if let Some(user) = user {
        return Ok(Purchaser::Registered {
            user_id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: non_empty(contact.phone.as_ref()),
        });
    }

    let (Some(name), Some(email), Some(phone)) = (
        non_empty(contact.name.as_ref()),
        non_empty(contact.email.as_ref()),
        non_empty(contact.phone.as_ref()),
    ) else {
        return Err(CheckoutError::IncompleteGuestContact);
    };

    Ok(Purchaser::Guest { name, email, phone })
}
