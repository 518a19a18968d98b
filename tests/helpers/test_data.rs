//! Test data helpers for creating request payloads

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use serde_json::{json, Value};

/// Group creation payload
pub fn group_body(email: &str, designation: &str, school: &str) -> Value {
    json!({
        "name": "DSA Study",
        "subject": "DSA",
        "createdByEmail": email,
        "createdByDesignation": designation,
        "school": school,
    })
}

/// Text-only chat message payload
pub fn text_message(sender: &str, content: &str) -> Value {
    json!({ "sender": sender, "content": content })
}

/// Signup payload with generated profile fields
pub fn signup_body(email: &str, password: &str) -> Value {
    let name: String = Name().fake();
    let phone: String = PhoneNumber().fake();

    json!({
        "email": email,
        "password": password,
        "name": name,
        "phone": phone,
        "designation": "Student",
        "school": "SOET",
    })
}

/// A fresh random email address
pub fn random_email() -> String {
    SafeEmail().fake()
}

/// Hand-built multipart body with a single `file` field
pub fn multipart_file(boundary: &str, field: &str, file_name: &str, mime_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}
