use serde::Deserialize;

pub const CONTACT_SUBJECT: &str = "Nuevo mensaje de contacto";

/// Raw contact form as posted by the site. Every field is optional here so
/// that absent and blank fields are rejected in one place.
#[derive(Deserialize, Debug, Default)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug)]
pub struct ContactMessage {
    name: String,
    email: String,
    phone: String,
    message: String,
}

impl TryFrom<ContactForm> for ContactMessage {
    type Error = String;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required(form.name)?,
            email: required(form.email)?,
            phone: required(form.phone)?,
            message: required(form.message)?,
        })
    }
}

fn required(field: Option<String>) -> Result<String, String> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err("Missing fields".to_string()),
    }
}

impl ContactMessage {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Plain-text body of the notification sent to the site owner.
    pub fn text_body(&self) -> String {
        format!(
            "Name: {}\nEmail: {}\nPhone: {}\n\nMessage:\n{}\n",
            self.name, self.email, self.phone, self.message
        )
    }
}
