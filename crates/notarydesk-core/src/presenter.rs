// ── Presentation seam ──

use url::Url;

use crate::model::Notice;

/// Where user-visible effects of a submission go: a toast area and a
/// browser redirect. The CLI prints and opens a browser; tests record.
pub trait Presenter: Send + Sync {
    fn toast(&self, notice: Notice);

    fn redirect(&self, url: &Url);
}
