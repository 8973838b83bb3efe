/// Identity the emulator stamps onto the resources it creates.
#[derive(Debug, Clone)]
pub struct EmulatorConfig {
    pub region: String,
    pub account_id: String,
}

impl EmulatorConfig {
    pub fn new(region: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            account_id: account_id.into(),
        }
    }

    /// Default availability zone for the configured region.
    pub fn default_availability_zone(&self) -> String {
        format!("{}a", self.region)
    }
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self::new("us-east-1", "123456789012")
    }
}
