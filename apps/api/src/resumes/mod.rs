// Resume document API: one draft document per user, section-wise upserts
// behind the validation gate, markdown export.

pub mod handlers;
pub mod postgres;
pub mod store;
