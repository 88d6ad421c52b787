//! Scrambling of sensitive request parameters for logging.

/// Parameter names whose values never appear in logs verbatim.
pub const SENSITIVE_PARAMS: &[&str] = &[
    "borrCard",
    "pinCode",
    "pinCodeChange",
    "address",
    "emailAddress",
];

/// Scrambles sensitive parameter values with a per-client salt.
///
/// A scrambled value is the leading hex digits of `md5(value ++ salt)`,
/// one per byte of the original value (at most 32). Requests made
/// through the same client therefore scramble a value identically and can
/// be correlated in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redactor {
    salt: u32,
}

impl Redactor {
    /// A redactor with a freshly drawn random salt.
    pub fn random() -> Self {
        Self::with_salt(rand::random())
    }

    pub fn with_salt(salt: u32) -> Self {
        Self { salt }
    }

    pub fn salt(&self) -> u32 {
        self.salt
    }

    /// Scramble one value.
    pub fn scramble(&self, value: &str) -> String {
        let digest = format!("{:x}", md5::compute(format!("{value}{}", self.salt)));
        let len = value.len().min(digest.len());
        digest[..len].to_string()
    }

    /// Copy of `params` with sensitive values scrambled, order preserved.
    pub fn filter<K, V>(&self, params: &[(K, V)]) -> Vec<(String, String)>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        params
            .iter()
            .map(|(k, v)| {
                let (k, v) = (k.as_ref(), v.as_ref());
                let value = if SENSITIVE_PARAMS.iter().any(|s| *s == k) {
                    self.scramble(v)
                } else {
                    v.to_string()
                };
                (k.to_string(), value)
            })
            .collect()
    }
}
