/// Return this error from a virtual user's behaviour function to indicate that the VU is bailing.
///
/// Use this when a VU hits a problem that is fatal for that VU but not for the scenario. For
/// example, if the target closes a keep-alive connection and refuses new ones from this VU, the
/// VU can bail while the remaining VUs keep generating load.
#[derive(derive_more::Error, derive_more::Display, Debug)]
pub struct VuBailError {
    msg: String,
}

impl Default for VuBailError {
    fn default() -> Self {
        Self {
            msg: "Virtual user is bailing".to_string(),
        }
    }
}
