//! The create-uniform submission and the multipart parts derived from it.

use bytes::Bytes;
use serde::Deserialize;

use crate::record::{SchoolType, UniformRecord, WearKind};

/// An image file attached to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
  pub file_name: String,
  pub mime:      String,
  pub bytes:     Bytes,
}

/// A new uniform record, as collected by the create form.
///
/// The struct can hold compound/church data whatever the school type; the
/// accessors below decide what actually goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUniform {
  pub school:         String,
  pub school_type:    SchoolType,
  pub uniform_combo:  String,
  pub compound_wear:  Option<String>,
  pub church_wear:    Option<String>,
  pub uniform_image:  Option<ImageUpload>,
  pub compound_image: Option<ImageUpload>,
  pub church_image:   Option<ImageUpload>,
}

impl NewUniform {
  pub fn new(school: impl Into<String>, school_type: SchoolType, uniform_combo: impl Into<String>) -> Self {
    Self {
      school: school.into(),
      school_type,
      uniform_combo: uniform_combo.into(),
      compound_wear: None,
      church_wear: None,
      uniform_image: None,
      compound_image: None,
      church_image: None,
    }
  }

  fn image(&self, kind: WearKind) -> Option<&ImageUpload> {
    match kind {
      WearKind::Uniform => self.uniform_image.as_ref(),
      WearKind::Compound => self.compound_image.as_ref(),
      WearKind::Church => self.church_image.as_ref(),
    }
  }

  /// Text parts in submission order. Compound and church wear are only
  /// present for secondary schools and only when non-empty.
  pub fn text_fields(&self) -> Vec<(&'static str, String)> {
    let mut fields = vec![
      ("school", self.school.clone()),
      ("schoolType", self.school_type.as_str().to_string()),
      (WearKind::Uniform.text_field(), self.uniform_combo.clone()),
    ];
    if self.school_type == SchoolType::Secondary {
      let extras = [
        (WearKind::Compound, &self.compound_wear),
        (WearKind::Church, &self.church_wear),
      ];
      for (kind, value) in extras {
        if let Some(v) = value.as_deref().filter(|v| !v.trim().is_empty()) {
          fields.push((kind.text_field(), v.to_string()));
        }
      }
    }
    fields
  }

  /// File parts, keyed by multipart field name, for the wear kinds that
  /// apply to this school type.
  pub fn file_parts(&self) -> Vec<(&'static str, &ImageUpload)> {
    WearKind::ALL
      .into_iter()
      .filter(|kind| kind.applies_to(self.school_type))
      .filter_map(|kind| self.image(kind).map(|img| (kind.image_field(), img)))
      .collect()
  }
}

/// The JSON body of a successful create. Every field is optional because
/// backends differ in what they echo back.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateReceipt {
  #[serde(default)]
  pub message: Option<String>,
  #[serde(default)]
  pub uniform: Option<UniformRecord>,
}
