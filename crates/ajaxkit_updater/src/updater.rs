use crate::effects::{Effect, Effects};
use crate::insertion::{InsertionStrategy, ResolvedInsertion};
use crate::settings::UpdaterSettings;
use crate::target::{split_reference, Target};
use ajaxkit_shared::document::DocumentHandle;
use ajaxkit_shared::errors::Error;
use ajaxkit_shared::node::NodeId;
use ajaxkit_shared::traits::dom::{Dom, Insertion};
use ajaxkit_shared::traits::fetch::TextFetcher;
use ajaxkit_shared::types::Result;
use ajaxkit_web_platform::{Callback, FutureExecutor, TimerId, TokioExecutor, WebTimers};
use log::{debug, info, warn};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::time::Duration;

/// A pending update. Resolves to the fetched text once it has been inserted.
pub type UpdateFuture = Pin<Box<dyn Future<Output = Result<String>>>>;

/// Fetches content and places it into the document.
///
/// The updater holds handles to its three collaborators: the document, the fetcher and the timers.
/// Cloning it is cheap and every clone works on the same collaborators.
pub struct ContentUpdater<D: Dom, F: TextFetcher> {
    document: DocumentHandle<D>,
    fetcher: Rc<F>,
    timers: WebTimers,
    settings: UpdaterSettings,
}

impl<D: Dom, F: TextFetcher> Clone for ContentUpdater<D, F> {
    fn clone(&self) -> Self {
        Self {
            document: self.document.clone(),
            fetcher: self.fetcher.clone(),
            timers: self.timers.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<D: Dom, F: TextFetcher> ContentUpdater<D, F> {
    /// Creates an updater with the settings found in the config store
    pub fn new(document: DocumentHandle<D>, fetcher: Rc<F>, timers: WebTimers) -> Self {
        Self {
            document,
            fetcher,
            timers,
            settings: UpdaterSettings::from_config(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: UpdaterSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &UpdaterSettings {
        &self.settings
    }

    pub fn document(&self) -> &DocumentHandle<D> {
        &self.document
    }

    /// Effects working on the same document and timers as this updater
    pub fn effects(&self) -> Effects<D> {
        Effects::new(self.document.clone(), self.timers.clone(), self.settings.clone())
    }

    /// Fetches `source` and places its text at `target`.
    ///
    /// The locator, target and strategy are checked right away, so a bad call fails here without
    /// anything being fetched. The returned future performs the fetch and the insertion; it fails
    /// with `NetworkFailure` when the fetch does, leaving the document untouched.
    pub fn update(
        &self,
        source: &str,
        target: impl Into<Target>,
        insertion: Option<InsertionStrategy>,
    ) -> Result<UpdateFuture> {
        self.start(source, target.into(), insertion, None)
    }

    /// Like [`ContentUpdater::update`], and runs `effect` on the target node once the content is in
    pub fn update_with_effect(
        &self,
        source: &str,
        target: impl Into<Target>,
        insertion: Option<InsertionStrategy>,
        effect: Effect,
    ) -> Result<UpdateFuture> {
        self.start(source, target.into(), insertion, Some(effect))
    }

    /// Runs an update every `delay_ms` milliseconds, the first one after a full delay. Every tick
    /// resolves the target again; a failing tick is logged and the schedule goes on. Stop it with
    /// [`ContentUpdater::cancel`].
    pub fn periodic_update(
        &self,
        delay_ms: u64,
        source: &str,
        target: impl Into<Target>,
        insertion: Option<InsertionStrategy>,
    ) -> Result<TimerId> {
        if delay_ms == 0 {
            return Err(Error::InvalidDelay.into());
        }
        check_locator(source)?;

        let target = target.into();

        // The node may come and go between ticks, strategy names can be checked now
        if let Target::Ref(reference) = &target {
            if let (Some(name), _) = split_reference(reference) {
                name.parse::<Insertion>()?;
            }
        }
        if let Some(strategy) = &insertion {
            strategy.clone().resolve()?;
        }

        let updater = self.clone();
        let url = source.to_string();
        let tick_target = target.clone();

        let callback = Callback::new(move |exec: &mut TokioExecutor, ()| {
            match updater.start(&url, tick_target.clone(), insertion.clone(), None) {
                Ok(update) => {
                    let url = url.clone();
                    exec.execute(async move {
                        if let Err(err) = update.await {
                            warn!("updater: periodic update of {url} failed: {err}");
                        }
                    });
                }
                Err(err) => warn!("updater: periodic update of {url} skipped: {err}"),
            }
        });

        let id = self.timers.set_interval(Duration::from_millis(delay_ms), callback);

        info!("updater: {source} into {target:?} every {delay_ms}ms");
        Ok(id)
    }

    /// Stops a periodic update. Returns false when the timer was not running. A fetch that is
    /// already in flight still completes.
    pub fn cancel(&self, id: TimerId) -> bool {
        let cancelled = self.timers.clear(id);
        debug!("updater: cancel {id:?} (was running: {cancelled})");
        cancelled
    }

    fn start(
        &self,
        source: &str,
        target: Target,
        insertion: Option<InsertionStrategy>,
        effect: Option<Effect>,
    ) -> Result<UpdateFuture> {
        check_locator(source)?;

        let resolved = target.resolve(&*self.document.get(), insertion, self.settings.default_insertion)?;
        let effects = effect.map(|effect| (effect, self.effects()));

        let update: UpdateFuture = Box::pin(run_update(
            self.document.clone(),
            self.fetcher.clone(),
            source.to_string(),
            resolved.node,
            resolved.insertion,
            effects,
        ));
        Ok(update)
    }
}

fn check_locator(source: &str) -> Result<()> {
    if source.trim().is_empty() {
        return Err(Error::InvalidLocator.into());
    }
    Ok(())
}

async fn run_update<D: Dom, F: TextFetcher>(
    document: DocumentHandle<D>,
    fetcher: Rc<F>,
    source: String,
    node: NodeId,
    insertion: ResolvedInsertion,
    effect: Option<(Effect, Effects<D>)>,
) -> Result<String> {
    let text = match fetcher.fetch_text(&source).await {
        Ok(text) => text,
        Err(err) => {
            warn!("updater: fetching {source} failed: {err}");
            if matches!(Error::kind_of(&err), Some(Error::NetworkFailure(_))) {
                return Err(err);
            }
            return Err(Error::NetworkFailure(format!("{source}: {err}")).into());
        }
    };

    let inserted = insertion.apply(&mut *document.get_mut(), node, &text)?;
    debug!("updater: {} bytes from {source} placed {insertion:?} node {node}", text.len());

    if let Some((effect, effects)) = effect {
        // A replaced node is gone, its first replacement element takes the effect
        let subject = match insertion.builtin() {
            Some(Insertion::Replace) => inserted.first().copied(),
            _ => Some(node),
        };

        match subject {
            Some(subject) => {
                if let Err(err) = effects.apply(effect, subject) {
                    warn!("updater: {effect} on node {subject} failed: {err}");
                }
            }
            None => warn!("updater: {effect} skipped, {source} replaced node {node} without an element"),
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::HighlightColor;
    use ajaxkit_dom::Document;
    use ajaxkit_net::testing::StaticFetcher;
    use tokio::task::LocalSet;
    use tokio::time::sleep;

    struct Fixture {
        document: DocumentHandle<Document>,
        fetcher: Rc<StaticFetcher>,
        timers: WebTimers,
        updater: ContentUpdater<Document, StaticFetcher>,
        list: NodeId,
    }

    fn fixture(fetcher: StaticFetcher) -> Fixture {
        let mut doc = Document::new();
        let body = doc.create_element(doc.get_root(), "body", None).unwrap();
        let list = doc.create_element(body, "ul", Some("list")).unwrap();
        doc.insert(list, Insertion::Inside, "<li>a</li>").unwrap();

        let document = DocumentHandle::create(doc);
        let fetcher = Rc::new(fetcher);
        let timers = WebTimers::new();
        let updater = ContentUpdater::new(document.clone(), fetcher.clone(), timers.clone())
            .with_settings(UpdaterSettings::default());

        Fixture {
            document,
            fetcher,
            timers,
            updater,
            list,
        }
    }

    fn list_html(f: &Fixture) -> String {
        f.document.get().inner_html(f.list).unwrap()
    }

    #[tokio::test]
    async fn bottom_appends_to_list() {
        let f = fixture(StaticFetcher::new().with_body("/data.html", "<li>x</li>"));

        let text = f.updater.update("/data.html", "bottom#list", None).unwrap().await.unwrap();

        assert_eq!(text, "<li>x</li>");
        assert_eq!(list_html(&f), "<li>a</li><li>x</li>");
        assert_eq!(f.fetcher.requests(), vec!["/data.html"]);
    }

    #[tokio::test]
    async fn default_strategy_replaces_contents() {
        let f = fixture(StaticFetcher::new().with_body("/data.html", "<li>x</li>"));

        f.updater.update("/data.html", "list", None).unwrap().await.unwrap();
        assert_eq!(list_html(&f), "<li>x</li>");
    }

    #[tokio::test]
    async fn configured_default_strategy_is_used() {
        let f = fixture(StaticFetcher::new().with_body("/data.html", "<li>x</li>"));
        let updater = f.updater.clone().with_settings(UpdaterSettings {
            default_insertion: Insertion::Top,
            ..UpdaterSettings::default()
        });

        updater.update("/data.html", "list", None).unwrap().await.unwrap();
        assert_eq!(list_html(&f), "<li>x</li><li>a</li>");
    }

    #[tokio::test]
    async fn node_handle_with_before() {
        let f = fixture(StaticFetcher::new().with_body("/intro.html", "<p>intro</p>"));

        f.updater
            .update("/intro.html", f.list, Some("before".into()))
            .unwrap()
            .await
            .unwrap();

        let body = f.document.get().write();
        assert_eq!(body, r#"<body><p>intro</p><ul id="list"><li>a</li></ul></body>"#);
    }

    #[tokio::test]
    async fn custom_strategy() {
        let f = fixture(StaticFetcher::new().with_body("/data.html", "x"));
        let wrap = InsertionStrategy::custom(|dom, node, content| {
            dom.insert(node, Insertion::Bottom, &format!("<li>{content}</li>"))
        });

        f.updater.update("/data.html", "list", Some(wrap)).unwrap().await.unwrap();
        assert_eq!(list_html(&f), "<li>a</li><li>x</li>");
    }

    #[tokio::test]
    async fn network_failure_leaves_document_untouched() {
        let f = fixture(StaticFetcher::new().with_failure("/data.html", "connection refused"));
        let before = f.document.get().write();

        let err = f.updater.update("/data.html", "bottom#list", None).unwrap().await.unwrap_err();

        assert!(matches!(Error::kind_of(&err), Some(Error::NetworkFailure(_))));
        assert_eq!(f.document.get().write(), before);
    }

    #[test]
    fn bad_calls_fail_before_fetching() {
        let f = fixture(StaticFetcher::new().with_body("/data.html", "x"));

        let err = f.updater.update("/data.html", "missing", None).err().unwrap();
        assert_eq!(Error::kind_of(&err), Some(&Error::InvalidTarget("missing".into())));

        let err = f.updater.update("/data.html", "middle#list", None).err().unwrap();
        assert_eq!(
            Error::kind_of(&err),
            Some(&Error::UnknownInsertionStrategy("middle".into()))
        );

        let err = f.updater.update("/data.html", "list", Some("middle".into())).err().unwrap();
        assert!(matches!(Error::kind_of(&err), Some(Error::UnknownInsertionStrategy(_))));

        let err = f.updater.update("  ", "list", None).err().unwrap();
        assert_eq!(Error::kind_of(&err), Some(&Error::InvalidLocator));

        assert!(f.fetcher.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn update_with_highlight() {
        LocalSet::new()
            .run_until(async {
                let f = fixture(StaticFetcher::new().with_body("/data.html", "<li>x</li>"));
                let red = Effect::Highlight(HighlightColor::Red);

                f.updater
                    .update_with_effect("/data.html", "bottom#list", None, red)
                    .unwrap()
                    .await
                    .unwrap();

                let color = f.document.get().background_color(f.list).unwrap();
                assert_eq!(color, Some(HighlightColor::Red.rgb()));

                sleep(Duration::from_millis(1100)).await;
                assert_eq!(f.document.get().background_color(f.list).unwrap(), None);
                assert!(f.timers.is_empty());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn replace_with_highlight_marks_the_new_element() {
        LocalSet::new()
            .run_until(async {
                let f = fixture(StaticFetcher::new().with_body("/list.html", r#"<ul id="list"><li>x</li></ul>"#));
                let green = Effect::Highlight(HighlightColor::Green);

                f.updater
                    .update_with_effect("/list.html", "replace#list", None, green)
                    .unwrap()
                    .await
                    .unwrap();

                let new_list = f.document.get().node_by_named_id("list").unwrap();
                assert_ne!(new_list, f.list);
                assert_eq!(
                    f.document.get().background_color(new_list).unwrap(),
                    Some(HighlightColor::Green.rgb())
                );

                sleep(Duration::from_millis(1100)).await;
                assert_eq!(f.document.get().background_color(new_list).unwrap(), None);
                assert!(f.timers.is_empty());
            })
            .await;
    }

    #[tokio::test]
    async fn replace_without_elements_skips_the_effect() {
        let f = fixture(StaticFetcher::new().with_body("/data.html", "plain text"));

        let text = f
            .updater
            .update_with_effect("/data.html", "replace#list", None, Effect::Blink)
            .unwrap()
            .await
            .unwrap();

        assert_eq!(text, "plain text");
        assert_eq!(f.document.get().write(), "<body>plain text</body>");
        assert!(f.timers.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_replace_finds_the_new_node_every_tick() {
        LocalSet::new()
            .run_until(async {
                let f = fixture(StaticFetcher::new().with_body("/list.html", r#"<ul id="list"><li>1</li></ul>"#));

                let id = f
                    .updater
                    .periodic_update(1000, "/list.html", "replace#list", None)
                    .unwrap();

                sleep(Duration::from_millis(1001)).await;
                assert_eq!(f.document.get().write(), r#"<body><ul id="list"><li>1</li></ul></body>"#);

                f.fetcher.set_body("/list.html", r#"<ul id="list"><li>2</li></ul>"#);
                sleep(Duration::from_millis(1000)).await;
                f.fetcher.set_body("/list.html", r#"<ul id="list"><li>3</li></ul>"#);
                sleep(Duration::from_millis(1000)).await;

                assert_eq!(f.fetcher.requests().len(), 3);
                assert_eq!(f.document.get().write(), r#"<body><ul id="list"><li>3</li></ul></body>"#);

                assert!(f.updater.cancel(id));
            })
            .await;
    }

    /// Answers `<li>{url}</li>` after the delay configured for the url
    struct SlowFetcher {
        delays: Vec<(&'static str, u64)>,
    }

    impl TextFetcher for SlowFetcher {
        async fn fetch_text(&self, url: &str) -> Result<String> {
            let delay = self
                .delays
                .iter()
                .find(|(path, _)| *path == url)
                .map_or(0, |(_, delay)| *delay);

            sleep(Duration::from_millis(delay)).await;
            Ok(format!("<li>{url}</li>"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_updates_complete_independently() {
        LocalSet::new()
            .run_until(async {
                let mut doc = Document::new();
                let list = doc.create_element(doc.get_root(), "ul", Some("list")).unwrap();
                let document = DocumentHandle::create(doc);

                let fetcher = SlowFetcher {
                    delays: vec![("/slow", 300), ("/fast", 100)],
                };
                let updater = ContentUpdater::new(document.clone(), Rc::new(fetcher), WebTimers::new())
                    .with_settings(UpdaterSettings::default());

                let finished = Rc::new(std::cell::RefCell::new(Vec::new()));
                for source in ["/slow", "/fast"] {
                    let update = updater.update(source, "bottom#list", None).unwrap();
                    let finished = finished.clone();
                    tokio::task::spawn_local(async move {
                        let text = update.await.unwrap();
                        finished.borrow_mut().push(text);
                    });
                }

                sleep(Duration::from_millis(150)).await;
                assert_eq!(document.get().inner_html(list).unwrap(), "<li>/fast</li>");

                sleep(Duration::from_millis(200)).await;
                assert_eq!(
                    document.get().inner_html(list).unwrap(),
                    "<li>/fast</li><li>/slow</li>"
                );
                assert_eq!(*finished.borrow(), vec!["<li>/fast</li>", "<li>/slow</li>"]);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_update_until_cancelled() {
        LocalSet::new()
            .run_until(async {
                let f = fixture(StaticFetcher::new().with_body("/data.html", "<li>1</li>"));

                let id = f
                    .updater
                    .periodic_update(5000, "/data.html", "list", Some("inside".into()))
                    .unwrap();

                sleep(Duration::from_millis(4999)).await;
                assert!(f.fetcher.requests().is_empty());
                assert_eq!(list_html(&f), "<li>a</li>");

                sleep(Duration::from_millis(2)).await;
                assert_eq!(f.fetcher.requests().len(), 1);
                assert_eq!(list_html(&f), "<li>1</li>");

                f.fetcher.set_body("/data.html", "<li>2</li>");
                sleep(Duration::from_millis(5000)).await;
                assert_eq!(f.fetcher.requests().len(), 2);
                assert_eq!(list_html(&f), "<li>2</li>");

                assert!(f.updater.cancel(id));
                sleep(Duration::from_millis(20_000)).await;
                assert_eq!(f.fetcher.requests().len(), 2);
                assert!(!f.updater.cancel(id));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn failing_ticks_keep_the_schedule() {
        LocalSet::new()
            .run_until(async {
                let f = fixture(StaticFetcher::new().with_failure("/data.html", "timed out"));

                let id = f.updater.periodic_update(1000, "/data.html", "list", None).unwrap();

                sleep(Duration::from_millis(3500)).await;
                assert_eq!(f.fetcher.requests().len(), 3);
                assert_eq!(list_html(&f), "<li>a</li>");

                f.updater.cancel(id);
            })
            .await;
    }

    #[test]
    fn periodic_update_rejects_bad_calls() {
        let f = fixture(StaticFetcher::new());

        let err = f.updater.periodic_update(0, "/data.html", "list", None).unwrap_err();
        assert_eq!(Error::kind_of(&err), Some(&Error::InvalidDelay));

        let err = f.updater.periodic_update(1000, "", "list", None).unwrap_err();
        assert_eq!(Error::kind_of(&err), Some(&Error::InvalidLocator));

        let err = f.updater.periodic_update(1000, "/data.html", "middle#list", None).unwrap_err();
        assert!(matches!(Error::kind_of(&err), Some(Error::UnknownInsertionStrategy(_))));

        assert!(f.timers.is_empty());
    }
}
