//! Right names checked by the authorization gate.
//!
//! Rights are plain strings so the role-to-rights table stays data rather
//! than code. The constants below are the only rights routes reference.

// Hospitals
pub const GET_HOSPITALS: &str = "getHospitals";
pub const MANAGE_HOSPITALS: &str = "manageHospitals";

// Doctors
pub const CREATE_DOCTORS: &str = "createDoctors";
pub const GET_DOCTORS: &str = "getDoctors";
pub const MANAGE_DOCTORS: &str = "manageDoctors";

// Chief doctors
pub const CREATE_CHIEF_DOCTORS: &str = "createChiefDoctors";
pub const GET_CHIEF_DOCTORS: &str = "getChiefDoctors";
pub const MANAGE_CHIEF_DOCTORS: &str = "manageChiefDoctors";

// Staff and patient records
pub const GET_USERS: &str = "getUsers";
pub const MANAGE_USERS: &str = "manageUsers";
