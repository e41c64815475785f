use secstr::SecStr;

/// This trait is used to conveniently convert
/// `SecStr`s into `String`s, e.g. right before
/// handing a password over to the SMTP transport.
pub trait SecureStringToUnsecureString {
    fn to_unsecure_string(&self) -> std::string::String;
}

/// Converts `SecStr` into unsecure `String`
///
/// # Arguments
///
/// - none
///
/// # Returns
///
/// - `String`: unsecure representation of the stored string,
///   invalid UTF-8 sequences are replaced.
impl SecureStringToUnsecureString for SecStr {
    fn to_unsecure_string(&self) -> std::string::String {
        String::from_utf8_lossy(self.unsecure()).into_owned()
    }
}
