//! Dashboard forms.
//!
//! Each form is the set of flags accepted by `add` and `edit`. A form is validated here, before
//! anything is dispatched: a record with a blank required field never reaches a store.
//!
//! Optional text flags given as an empty string clear the field on `edit`.

use clap::Args;
use clinic_types::{Doctor, NonEmptyText, Patient, Visit};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{field} is required")]
    Required { field: &'static str },
}

/// Turns form input into a record, either new or merged over an existing one.
pub trait RecordForm<E> {
    fn create(self) -> Result<E, FormError>;
    fn apply(self, existing: E) -> Result<E, FormError>;
}

fn required(value: Option<&str>, field: &'static str) -> Result<String, FormError> {
    NonEmptyText::required(value)
        .map(String::from)
        .map_err(|_| FormError::Required { field })
}

fn optional(value: Option<String>) -> Option<String> {
    NonEmptyText::optional(value.as_deref()).map(String::from)
}

/// Overwrites `slot` only when the flag was given.
fn merge(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = optional(value);
    }
}

// ============================================================================
// DOCTORS
// ============================================================================

#[derive(Args, Clone, Debug, Default)]
pub struct DoctorForm {
    /// Full name (required for a new doctor)
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub speciality: Option<String>,
}

impl RecordForm<Doctor> for DoctorForm {
    fn create(self) -> Result<Doctor, FormError> {
        Ok(Doctor {
            doctor_id: None,
            doctor_name: required(self.name.as_deref(), "doctorName")?,
            doctor_email: optional(self.email),
            doctor_phone: optional(self.phone),
            doctor_speciality: optional(self.speciality),
        })
    }

    fn apply(self, mut existing: Doctor) -> Result<Doctor, FormError> {
        if let Some(name) = self.name.as_deref() {
            existing.doctor_name = required(Some(name), "doctorName")?;
        }
        merge(&mut existing.doctor_email, self.email);
        merge(&mut existing.doctor_phone, self.phone);
        merge(&mut existing.doctor_speciality, self.speciality);
        Ok(existing)
    }
}

// ============================================================================
// PATIENTS
// ============================================================================

#[derive(Args, Clone, Debug, Default)]
pub struct PatientForm {
    /// Full name (required for a new patient)
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
}

impl RecordForm<Patient> for PatientForm {
    fn create(self) -> Result<Patient, FormError> {
        Ok(Patient {
            patient_id: None,
            patient_name: required(self.name.as_deref(), "patientName")?,
            patient_email: optional(self.email),
            patient_phone: optional(self.phone),
            patient_address: optional(self.address),
        })
    }

    fn apply(self, mut existing: Patient) -> Result<Patient, FormError> {
        if let Some(name) = self.name.as_deref() {
            existing.patient_name = required(Some(name), "patientName")?;
        }
        merge(&mut existing.patient_email, self.email);
        merge(&mut existing.patient_phone, self.phone);
        merge(&mut existing.patient_address, self.address);
        Ok(existing)
    }
}

// ============================================================================
// VISITS
// ============================================================================

#[derive(Args, Clone, Debug, Default)]
pub struct VisitForm {
    /// Visit type identifier (required for a new visit)
    #[arg(long = "visit-type-id")]
    pub visit_type_id: Option<i64>,
    #[arg(long = "visit-type")]
    pub visit_type: Option<String>,
    /// Duration in minutes
    #[arg(long)]
    pub duration: Option<f64>,
    /// Visit date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub fee: Option<f64>,
}

impl RecordForm<Visit> for VisitForm {
    fn create(self) -> Result<Visit, FormError> {
        let visit_type_id = self.visit_type_id.ok_or(FormError::Required {
            field: "visitTypeID",
        })?;
        Ok(Visit {
            visit_id: None,
            visit_type_id: Some(visit_type_id),
            visit_type: optional(self.visit_type),
            visit_duration: self.duration,
            visit_date: optional(self.date),
            visit_fee: self.fee,
        })
    }

    fn apply(self, mut existing: Visit) -> Result<Visit, FormError> {
        if self.visit_type_id.is_some() {
            existing.visit_type_id = self.visit_type_id;
        }
        merge(&mut existing.visit_type, self.visit_type);
        if self.duration.is_some() {
            existing.visit_duration = self.duration;
        }
        merge(&mut existing.visit_date, self.date);
        if self.fee.is_some() {
            existing.visit_fee = self.fee;
        }
        Ok(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_doctor_requires_name() {
        let form = DoctorForm {
            name: Some("   ".into()),
            email: Some("a@clinic.test".into()),
            ..DoctorForm::default()
        };
        assert_eq!(
            form.create(),
            Err(FormError::Required {
                field: "doctorName"
            })
        );
        assert_eq!(
            DoctorForm::default().create().unwrap_err().to_string(),
            "doctorName is required"
        );
    }

    #[test]
    fn test_new_doctor_trims_and_drops_blank_optionals() {
        let doctor = DoctorForm {
            name: Some(" Dr Ada ".into()),
            phone: Some("".into()),
            speciality: Some("Cardiology".into()),
            ..DoctorForm::default()
        }
        .create()
        .unwrap();

        assert_eq!(doctor.doctor_name, "Dr Ada");
        assert_eq!(doctor.doctor_phone, None);
        assert_eq!(doctor.doctor_speciality.as_deref(), Some("Cardiology"));
        assert_eq!(doctor.doctor_id, None);
    }

    #[test]
    fn test_edit_merges_only_given_flags() {
        let existing = Patient {
            patient_id: Some(7),
            patient_name: "Sam".into(),
            patient_email: Some("sam@clinic.test".into()),
            patient_phone: Some("0123".into()),
            patient_address: None,
        };

        let edited = PatientForm {
            phone: Some("".into()),
            address: Some("1 High St".into()),
            ..PatientForm::default()
        }
        .apply(existing)
        .unwrap();

        assert_eq!(edited.patient_id, Some(7));
        assert_eq!(edited.patient_name, "Sam");
        assert_eq!(edited.patient_email.as_deref(), Some("sam@clinic.test"));
        assert_eq!(edited.patient_phone, None);
        assert_eq!(edited.patient_address.as_deref(), Some("1 High St"));
    }

    #[test]
    fn test_edit_cannot_blank_required_name() {
        let existing = Patient {
            patient_id: Some(7),
            patient_name: "Sam".into(),
            ..Patient::default()
        };
        let err = PatientForm {
            name: Some("".into()),
            ..PatientForm::default()
        }
        .apply(existing)
        .unwrap_err();
        assert_eq!(
            err,
            FormError::Required {
                field: "patientName"
            }
        );
    }

    #[test]
    fn test_new_visit_requires_visit_type_id() {
        let form = VisitForm {
            date: Some("2024-05-01".into()),
            ..VisitForm::default()
        };
        assert_eq!(
            form.create(),
            Err(FormError::Required {
                field: "visitTypeID"
            })
        );

        let visit = VisitForm {
            visit_type_id: Some(2),
            fee: Some(45.0),
            ..VisitForm::default()
        }
        .create()
        .unwrap();
        assert_eq!(visit.visit_type_id, Some(2));
        assert_eq!(visit.visit_fee, Some(45.0));
    }
}
