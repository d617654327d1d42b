#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WarningEntry {
    pub user_id: u64,
    pub moderator_id: u64,
    pub reason: String,
    pub created_at: u64,
}

#[derive(Clone, Copy, Debug)]
pub struct NewWarning<'a> {
    pub user_id: u64,
    pub moderator_id: u64,
    pub reason: &'a str,
    pub created_at: u64,
}
