#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivationKey {
    pub key: String,
    pub created_by: u64,
    pub created_at: u64,
    pub is_used: bool,
    /// ISO-8601 style duration such as `P1D` or `PT30M`.
    pub duration: Option<String>,
    pub expires_at: Option<u64>,
    pub expired: bool,
}
