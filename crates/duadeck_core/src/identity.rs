/// Signed-in user as reported by the authenticator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}
