//! Provider payload builders for sign and stamp requests

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use esignbridge_domain::constants::{
    CANVAS_HEIGHT, CANVAS_WIDTH, PHONE_COUNTRY_CODE, SIGNATURE_AUTO_FIELDS, SIGNATURE_KINDS,
    SIGNATURE_TYPE, STAMP_ELEMENT_SIZE, STAMP_TYPE,
};
use esignbridge_domain::{
    DocumentMapping, GlobalSignRequest, PhoneNumber, ProviderSignRequest, ProviderSigner,
    SignerAnnotation, SignerRequest, StampAnnotation, StampRequest,
};

/// Signature box (width, height) for a request with `signer_count` signers.
///
/// More signers means smaller boxes so they fit side by side.
pub fn element_size(signer_count: usize) -> (f64, f64) {
    match signer_count {
        0 | 1 => (180.0, 140.0),
        2 => (150.0, 120.0),
        3 => (130.0, 100.0),
        _ => (110.0, 85.0),
    }
}

/// Provider body for a global sign request. Stamp positions are not sent
/// here; they are kept in the mapping for the stamp phase.
pub fn build_sign_request(
    request: &GlobalSignRequest,
    document: &[u8],
    filename: &str,
    callback_url: &str,
) -> ProviderSignRequest {
    let size = element_size(request.signers.len());
    ProviderSignRequest {
        doc: STANDARD.encode(document),
        filename: filename.to_string(),
        signers: request.signers.iter().map(|signer| build_signer(signer, size)).collect(),
        callback_url: callback_url.to_string(),
        document_deadline: request.document_deadline.clone(),
        entry_no: request.entry_no,
    }
}

fn build_signer(signer: &SignerRequest, (width, height): (f64, f64)) -> ProviderSigner {
    let annotations = signer
        .signature_positions
        .iter()
        .map(|position| SignerAnnotation {
            type_of: SIGNATURE_TYPE.to_string(),
            signature_type: SIGNATURE_KINDS.iter().map(|kind| kind.to_string()).collect(),
            page: if position.page > 0 { position.page } else { signer.sign_page },
            position_x: position.x,
            position_y: position.y,
            element_width: width,
            element_height: height,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            auto_fields: SIGNATURE_AUTO_FIELDS.iter().map(|field| field.to_string()).collect(),
        })
        .collect();

    let phone_number = (!signer.phone.trim().is_empty()).then(|| PhoneNumber {
        country_code: PHONE_COUNTRY_CODE.to_string(),
        number: signer.phone.trim().to_string(),
    });

    ProviderSigner {
        name: signer.name.clone(),
        email: signer.email.clone(),
        phone_number,
        requires_otp: signer.requires_otp,
        annotations,
        order: signer.order,
    }
}

/// Provider body for the e-stamp phase of a signed document.
pub fn build_stamp_request(
    mapping: &DocumentMapping,
    signed_document: &[u8],
    callback_url: &str,
) -> StampRequest {
    let annotations = mapping
        .stamp_positions
        .iter()
        .map(|position| StampAnnotation {
            page: position.page.max(1),
            position_x: position.x,
            position_y: position.y,
            element_width: STAMP_ELEMENT_SIZE,
            element_height: STAMP_ELEMENT_SIZE,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            type_of: STAMP_TYPE.to_string(),
        })
        .collect();

    StampRequest {
        doc: STANDARD.encode(signed_document),
        filename: mapping.filename.clone(),
        annotations,
        callback_url: callback_url.to_string(),
        document_deadline: mapping.document_deadline.clone(),
    }
}
