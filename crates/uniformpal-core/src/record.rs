//! The uniform record and the wear categories it describes.
//!
//! A record is immutable once the backend has assigned its `id`; the client
//! only ever lists it or deletes it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which kind of school a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchoolType {
  Primary,
  Secondary,
}

impl SchoolType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Primary => "primary",
      Self::Secondary => "secondary",
    }
  }

  /// The other variant.
  pub fn toggled(self) -> Self {
    match self {
      Self::Primary => Self::Secondary,
      Self::Secondary => Self::Primary,
    }
  }
}

impl fmt::Display for SchoolType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// One of the three wear categories a record can carry an image for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WearKind {
  Uniform,
  Compound,
  Church,
}

impl WearKind {
  pub const ALL: [WearKind; 3] = [Self::Uniform, Self::Compound, Self::Church];

  pub fn label(&self) -> &'static str {
    match self {
      Self::Uniform => "Uniform",
      Self::Compound => "Compound Wear",
      Self::Church => "Church Wear",
    }
  }

  /// Multipart field name carrying this category's image file.
  pub fn image_field(&self) -> &'static str {
    match self {
      Self::Uniform => "uniformImage",
      Self::Compound => "compoundImage",
      Self::Church => "churchImage",
    }
  }

  /// Multipart field name carrying this category's description.
  pub fn text_field(&self) -> &'static str {
    match self {
      Self::Uniform => "uniformCombo",
      Self::Compound => "compoundWear",
      Self::Church => "churchWear",
    }
  }

  /// Compound and church wear only exist for secondary schools.
  pub fn is_secondary_only(&self) -> bool { !matches!(self, Self::Uniform) }

  pub fn applies_to(&self, school_type: SchoolType) -> bool {
    !self.is_secondary_only() || school_type == SchoolType::Secondary
  }
}

/// A uniform entry as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniformRecord {
  #[serde(alias = "_id")]
  pub id:             String,
  pub school:         String,
  pub school_type:    SchoolType,
  pub uniform_combo:  String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub uniform_image:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub compound_wear:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub compound_image: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub church_wear:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub church_image:   Option<String>,
}

impl UniformRecord {
  /// Description text for `kind`. Empty strings count as absent.
  pub fn wear_text(&self, kind: WearKind) -> Option<&str> {
    let raw = match kind {
      WearKind::Uniform => Some(&self.uniform_combo),
      WearKind::Compound => self.compound_wear.as_ref(),
      WearKind::Church => self.church_wear.as_ref(),
    };
    present(raw)
  }

  /// Image path for `kind`, relative to the backend base URL.
  pub fn image_path(&self, kind: WearKind) -> Option<&str> {
    let raw = match kind {
      WearKind::Uniform => self.uniform_image.as_ref(),
      WearKind::Compound => self.compound_image.as_ref(),
      WearKind::Church => self.church_image.as_ref(),
    };
    present(raw)
  }

  /// The wear sections worth showing for this record, in display order.
  ///
  /// The uniform section is always present. Compound and church sections
  /// appear only on secondary records that describe that wear.
  pub fn wear_sections(&self) -> Vec<WearKind> {
    WearKind::ALL
      .into_iter()
      .filter(|kind| match kind {
        WearKind::Uniform => true,
        _ => {
          self.school_type == SchoolType::Secondary && self.wear_text(*kind).is_some()
        }
      })
      .collect()
  }

  /// Every image path shown by [`Self::wear_sections`].
  pub fn image_paths(&self) -> Vec<&str> {
    self
      .wear_sections()
      .into_iter()
      .filter_map(|kind| self.image_path(kind))
      .collect()
  }
}

fn present(value: Option<&String>) -> Option<&str> {
  value.map(String::as_str).filter(|s| !s.trim().is_empty())
}
