//! REST surface over the JSON stores.
//!
//! | Method      | Path                  | Behavior                          |
//! |-------------|-----------------------|-----------------------------------|
//! | GET, POST   | `/employees`          | object keyed by name / add        |
//! | DELETE      | `/employees/{name}`   | remove                            |
//! | GET, POST   | `/formulas`           | array / append                    |
//! | GET, POST   | `/incidents`          | array / append                    |
//! | GET, POST   | `/error-types`        | vocabulary / add                  |
//! | DELETE      | `/error-types/{name}` | remove                            |
//! | GET         | `/reports/production` | dashboard JSON (`start,end,group`)|
//! | GET         | `/reports/costs`      | dashboard JSON (`start,end,group`)|
//! | GET         | `/health`             | `ok`                              |

pub mod api;
pub mod handle;
mod server;

pub use api::{ApiError, AppState, api_router};
pub use handle::StoreHandle;
pub use server::{ServerConfig, build_router, start_server};
