use anyhow::Result;
use edoctor_core::EDoctor;

#[derive(Debug, Clone, Copy)]
pub(super) struct WebServeOptions<'a> {
    pub(super) host: &'a str,
    pub(super) port: u16,
}

pub(super) fn serve(app: EDoctor, options: WebServeOptions<'_>) -> Result<()> {
    edoctor_web::serve_web(app, options.host, options.port)
}
