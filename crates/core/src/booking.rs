//! Multi-step booking checkout.
//!
//! A flow starts on the contact step with the chosen restaurant, date, time
//! and party size, moves to the payment step once contact details are valid,
//! and completes when the reservation has been written. The payment step is
//! a simulation: card fields are checked for presence and then dropped.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::Rng;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::availability::{is_candidate_time, DEFAULT_PARTY_SIZE};
use crate::error::{not_blank, CoreError};
use crate::reservation::validate_party_size;
use crate::types::{wall_clock, DbId, Timestamp};

/// How far ahead a table can be booked.
pub const BOOKING_HORIZON_DAYS: i64 = 365;

/// Length of a booking confirmation code.
pub const CONFIRMATION_CODE_LEN: usize = 8;

const CONFIRMATION_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Seating time offered when the guest has not picked one (19:00).
pub fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(19, 0, 0).unwrap_or(NaiveTime::MIN)
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    CollectingContact,
    CollectingPayment,
    Completed,
}

impl BookingStep {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStep::CollectingContact => "collecting_contact",
            BookingStep::CollectingPayment => "collecting_payment",
            BookingStep::Completed => "completed",
        }
    }
}

pub mod state_machine {
    use super::BookingStep::{self, *};

    pub fn valid_transitions(from: BookingStep) -> &'static [BookingStep] {
        match from {
            CollectingContact => &[CollectingPayment],
            CollectingPayment => &[CollectingContact, Completed],
            Completed => &[],
        }
    }

    pub fn can_transition(from: BookingStep, to: BookingStep) -> bool {
        valid_transitions(from).contains(&to)
    }

    pub fn validate_transition(from: BookingStep, to: BookingStep) -> Result<(), String> {
        if can_transition(from, to) {
            Ok(())
        } else {
            Err(format!(
                "Invalid booking step transition: {} -> {}",
                from.as_str(),
                to.as_str()
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// What is being booked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingSelection {
    pub restaurant_id: DbId,
    pub date: NaiveDate,
    #[serde(with = "wall_clock")]
    pub time: NaiveTime,
    pub party_size: u32,
}

impl BookingSelection {
    /// Fill in today, 19:00 and a party of two for anything the guest left out.
    pub fn with_defaults(
        restaurant_id: DbId,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
        party_size: Option<u32>,
        today: NaiveDate,
    ) -> Self {
        Self {
            restaurant_id,
            date: date.unwrap_or(today),
            time: time.unwrap_or_else(default_time),
            party_size: party_size.unwrap_or(DEFAULT_PARTY_SIZE),
        }
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Party size bounds, slot grid membership, not in the past and not
    /// beyond the booking horizon.
    pub fn check(&self, now: NaiveDateTime) -> Result<(), CoreError> {
        validate_party_size(self.party_size).map_err(|m| CoreError::field("party_size", m))?;
        if !is_candidate_time(self.time) {
            return Err(CoreError::field(
                "time",
                format!(
                    "{} is not a bookable time slot",
                    wall_clock::format(&self.time)
                ),
            ));
        }
        if self.starts_at() <= now {
            return Err(CoreError::Validation(
                "Reservation time must be in the future".into(),
            ));
        }
        let within_horizon = now
            .date()
            .checked_add_signed(Duration::days(BOOKING_HORIZON_DAYS))
            .is_some_and(|last| self.date <= last);
        if !within_horizon {
            return Err(CoreError::field(
                "date",
                format!("Tables can be booked at most {BOOKING_HORIZON_DAYS} days ahead"),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ContactDetails {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 32, message = "Phone number is too long"))]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(length(max = 500, message = "Special requests are limited to 500 characters"))]
    pub special_requests: Option<String>,
}

impl ContactDetails {
    /// Trim everything and turn blank optional fields into `None`.
    pub fn normalized(self) -> Self {
        fn opt(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }
        Self {
            email: self.email.trim().to_string(),
            phone: opt(self.phone),
            special_requests: opt(self.special_requests),
        }
    }
}

/// Card details for the simulated payment step. Never stored.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaymentDetails {
    #[validate(custom(function = "not_blank", message = "Cardholder name is required"))]
    pub cardholder_name: String,
    #[validate(custom(function = "not_blank", message = "Card number is required"))]
    pub card_number: String,
    #[validate(custom(function = "not_blank", message = "Expiry date is required"))]
    pub expiry: String,
    #[validate(custom(function = "not_blank", message = "CVC is required"))]
    pub cvc: String,
}

// ---------------------------------------------------------------------------
// Flow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub reservation_id: DbId,
    pub confirmation_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingFlow {
    pub step: BookingStep,
    pub selection: BookingSelection,
    pub contact: ContactDetails,
    pub confirmation: Option<BookingConfirmation>,
    /// Set while a payment submission is in flight.
    pub processing_since: Option<Timestamp>,
}

impl BookingFlow {
    /// A fresh flow on the contact step, email prefilled from the signed-in user.
    pub fn new(selection: BookingSelection, email: impl Into<String>) -> Self {
        Self {
            step: BookingStep::CollectingContact,
            selection,
            contact: ContactDetails {
                email: email.into(),
                ..Default::default()
            },
            confirmation: None,
            processing_since: None,
        }
    }

    fn advance(&mut self, to: BookingStep) -> Result<(), CoreError> {
        state_machine::validate_transition(self.step, to).map_err(CoreError::Conflict)?;
        self.step = to;
        Ok(())
    }

    /// A busy flag older than `stale_after` no longer counts.
    pub fn is_processing(&self, now: Timestamp, stale_after: Duration) -> bool {
        self.processing_since
            .is_some_and(|since| now - since < stale_after)
    }

    pub fn submit_contact(&mut self, contact: ContactDetails) -> Result<(), CoreError> {
        if self.step != BookingStep::CollectingContact {
            return Err(CoreError::Conflict(format!(
                "Contact details cannot be submitted while {}",
                self.step.as_str()
            )));
        }
        let contact = contact.normalized();
        contact.validate()?;
        self.contact = contact;
        self.advance(BookingStep::CollectingPayment)
    }

    /// Return to the contact step, keeping what was entered.
    pub fn back(&mut self, now: Timestamp, stale_after: Duration) -> Result<(), CoreError> {
        if self.is_processing(now, stale_after) {
            return Err(CoreError::Conflict("Payment is being processed".into()));
        }
        self.advance(BookingStep::CollectingContact)?;
        self.processing_since = None;
        Ok(())
    }

    /// Validate the card fields and mark the flow busy.
    pub fn begin_payment(
        &mut self,
        payment: &PaymentDetails,
        now: Timestamp,
        stale_after: Duration,
    ) -> Result<(), CoreError> {
        if self.step != BookingStep::CollectingPayment {
            return Err(CoreError::Conflict(format!(
                "Payment cannot be submitted while {}",
                self.step.as_str()
            )));
        }
        if self.is_processing(now, stale_after) {
            return Err(CoreError::Conflict("Payment is already being processed".into()));
        }
        payment.validate()?;
        self.processing_since = Some(now);
        Ok(())
    }

    /// Record the written reservation and finish the flow.
    pub fn complete(&mut self, confirmation: BookingConfirmation) -> Result<(), CoreError> {
        if self.processing_since.is_none() {
            return Err(CoreError::Conflict("No payment is being processed".into()));
        }
        self.advance(BookingStep::Completed)?;
        self.processing_since = None;
        self.confirmation = Some(confirmation);
        Ok(())
    }

    /// Clear the busy flag after a failed attempt; the flow stays on payment.
    pub fn abort_payment(&mut self) {
        self.processing_since = None;
    }
}

/// Random uppercase alphanumeric reference shown to the guest.
pub fn generate_confirmation_code() -> String {
    let mut rng = rand::rng();
    (0..CONFIRMATION_CODE_LEN)
        .map(|_| CONFIRMATION_CHARSET[rng.random_range(0..CONFIRMATION_CHARSET.len())] as char)
        .collect()
}

pub fn is_valid_confirmation_code(code: &str) -> bool {
    code.len() == CONFIRMATION_CODE_LEN
        && code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}
