pub mod auth;
pub mod chief_doctors;
pub mod doctors;
pub mod hospitals;
pub mod tokens;

pub use self::auth::model::Actor;
pub use self::chief_doctors::model::ChiefDoctor;
pub use self::doctors::model::Doctor;
pub use self::hospitals::model::{Hospital, HospitalSnapshot};
