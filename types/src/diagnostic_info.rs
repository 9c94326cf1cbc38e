/// Operation-level diagnostics. The publish path never populates these; the
/// field exists so response bodies match the service layout.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DiagnosticInfo {
    pub symbolic_id: Option<i32>,
    pub namespace_uri: Option<i32>,
    pub additional_info: Option<String>,
}
