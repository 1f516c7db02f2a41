pub mod cookie;

pub use cookie::{
    create_logout_cookie, create_session_cookie, extract_session_cookie, CookieConfig,
};
