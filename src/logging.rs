//! Logging utilities.

/// Replace the password in a connection URI with `***` before it is logged.
///
/// Only the userinfo of the authority is touched, so multi-host lists,
/// `mongodb+srv` URIs and `@` characters in the path or query survive.
pub fn mask_connection_password(conn_str: &str) -> String {
    let authority_start = conn_str.find("://").map_or(0, |p| p + 3);
    let rest = &conn_str[authority_start..];
    let authority_len = rest.find(['/', '?']).unwrap_or(rest.len());
    let Some(userinfo_len) = rest[..authority_len].rfind('@') else {
        return conn_str.to_string();
    };
    let Some(user_len) = rest[..userinfo_len].find(':') else {
        return conn_str.to_string();
    };

    let password_start = authority_start + user_len + 1;
    let password_end = authority_start + userinfo_len;
    format!(
        "{}***{}",
        &conn_str[..password_start],
        &conn_str[password_end..]
    )
}
