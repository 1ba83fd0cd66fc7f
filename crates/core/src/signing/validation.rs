//! Sign request validation

use esignbridge_domain::constants::{
    REMINDER_AFTER_RECEIVED_MAX, REMINDER_AFTER_RECEIVED_MIN, SIGNING_DEADLINE_MAX,
    SIGNING_DEADLINE_MIN,
};
use esignbridge_domain::{
    DocumentDeadline, EsignBridgeError, GlobalSignRequest, RecurringReminder, Result,
};

/// Check signers and deadline settings before anything is uploaded.
///
/// Signers are numbered from 1 in error messages.
pub fn validate_sign_request(request: &GlobalSignRequest) -> Result<()> {
    if request.signers.is_empty() {
        return Err(invalid("at least one signer is required"));
    }

    for (index, signer) in request.signers.iter().enumerate() {
        let n = index + 1;
        if signer.name.trim().is_empty() {
            return Err(invalid(format!("signer {n}: name is required")));
        }
        if signer.email.trim().is_empty() {
            return Err(invalid(format!("signer {n}: email is required")));
        }
        if signer.sign_page == 0 {
            return Err(invalid(format!("signer {n}: sign_page must be greater than 0")));
        }
        if signer.signature_positions.is_none() {
            return Err(invalid(format!("signer {n}: signature_positions is required")));
        }
    }

    if let Some(deadline) = &request.document_deadline {
        validate_deadline(deadline)?;
    }

    Ok(())
}

/// Zero values mean "not set" and are accepted.
pub fn validate_deadline(deadline: &DocumentDeadline) -> Result<()> {
    let signing = deadline.signing_deadline;
    if signing != 0 && !(SIGNING_DEADLINE_MIN..=SIGNING_DEADLINE_MAX).contains(&signing) {
        return Err(invalid(format!(
            "signing_deadline must be between {SIGNING_DEADLINE_MIN} and {SIGNING_DEADLINE_MAX}"
        )));
    }

    let reminder = deadline.days_reminder_after_receive;
    if reminder != 0
        && !(REMINDER_AFTER_RECEIVED_MIN..=REMINDER_AFTER_RECEIVED_MAX).contains(&reminder)
    {
        return Err(invalid(format!(
            "days_reminder_after_received must be between {REMINDER_AFTER_RECEIVED_MIN} and {REMINDER_AFTER_RECEIVED_MAX}"
        )));
    }

    let recurring = deadline.recurring_reminder.as_str();
    if !recurring.is_empty() && recurring.parse::<RecurringReminder>().is_err() {
        return Err(invalid(
            "recurring_reminder must be one of: none, daily, three_days, weekly, monthly",
        ));
    }

    Ok(())
}

fn invalid(message: impl Into<String>) -> EsignBridgeError {
    EsignBridgeError::Validation(message.into())
}
