//! The `{ success, data, message }` envelope shared by every endpoint.
//!
//! A successful check-in:
//!
//! ```json
//! { "success": true, "data": { "ok": true, "distance": 12 }, "message": "Attendance recorded" }
//! ```
//!
//! A check-in outside the geofence keeps the measured distance:
//!
//! ```json
//! {
//!   "success": false,
//!   "data": { "distance": 87 },
//!   "message": "Outside the attendance area (87 m away)"
//! }
//! ```
//!
//! A bulk update that stopped part way reports what was applied:
//!
//! ```json
//! {
//!   "success": false,
//!   "data": { "ok": false, "updated": 20, "missing": [], "failed": ["122140021"] },
//!   "message": "Attendance was only partially updated"
//! }
//! ```
//!
//! Every other failure carries `data: null`.

use serde::Serialize;

#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Failed outcome that still reports details, such as a rejected distance
    /// or a partial bulk result.
    pub fn failure(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            message: message.into(),
        }
    }

    /// Failed outcome with empty data (`null` for `()` and `Value`).
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self::failure(T::default(), message)
    }
}
