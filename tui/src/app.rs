use std::future::Future;
use std::sync::mpsc::Receiver;
use std::sync::mpsc::channel;
use std::time::Duration;
use std::time::Instant;

use crossterm::event;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use ratatui::Terminal;
use ratatui::backend::Backend;
use raksha_backend_client::AlertSubscription;
use raksha_backend_client::ApiResult;
use raksha_backend_client::GatewayClient;
use raksha_core::VoiceCapability;
use raksha_core::session::Action;
use raksha_core::session::Effect;
use raksha_core::session::RequestKind;
use raksha_core::session::SessionSettings;
use raksha_core::session::SessionState;
use raksha_core::session::SubscriptionId;
use raksha_core::voice::RecognizerEvent;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;
use crate::key_hint;
use crate::views;
use crate::views::Views;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Owns the session, executes its effects and drives the terminal.
pub(crate) struct App {
    state: SessionState,
    views: Views,
    client: GatewayClient,
    voice: VoiceCapability,
    runtime: Handle,
    app_event_tx: AppEventSender,
    app_event_rx: Receiver<AppEvent>,
    live: Option<(SubscriptionId, AlertSubscription)>,
    splash_timer: Option<JoinHandle<()>>,
    exit: bool,
}

impl App {
    pub(crate) fn new(
        settings: SessionSettings,
        client: GatewayClient,
        voice: VoiceCapability,
        runtime: Handle,
    ) -> Self {
        let (tx, rx) = channel();
        let (state, effects) = SessionState::boot(settings);
        let mut app = Self {
            state,
            views: Views::default(),
            client,
            voice,
            runtime,
            app_event_tx: AppEventSender::new(tx),
            app_event_rx: rx,
            live: None,
            splash_timer: None,
            exit: false,
        };
        app.run_effects(effects);
        app
    }

    pub(crate) fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        while !self.exit {
            terminal.draw(|frame| views::render(frame, &self.state, &self.views))?;

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Paste(text) => {
                        for c in text.chars().filter(|c| !c.is_control()) {
                            self.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
                        }
                    }
                    _ => {}
                }
            }

            while let Ok(event) = self.app_event_rx.try_recv() {
                self.handle_app_event(event);
            }
            self.check_live_feed();
        }
        self.shutdown();
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key_hint::QUIT.is_press(key) {
            self.app_event_tx.send(AppEvent::ExitRequest);
            return;
        }
        if self.state.notice().is_some() {
            if key_hint::ACTIVATE.is_press(key) || key_hint::BACK.is_press(key) {
                self.dispatch(Action::DismissNotice);
            }
            return;
        }
        if let Some(action) = self.views.handle_key(&self.state, key) {
            self.dispatch(action);
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Session(action) => self.dispatch(action),
            AppEvent::LiveFeedReady { id, subscription } => {
                if self.state.live_subscription() == Some(id) {
                    if let Some((old_id, old)) = self.live.replace((id, subscription)) {
                        debug!("replacing live feed {old_id}");
                        old.close();
                    }
                } else {
                    debug!("closing live feed {id} opened after teardown");
                    subscription.close();
                }
            }
            AppEvent::ExitRequest => self.exit = true,
        }
    }

    pub(crate) fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        let (next, effects) = state.reduce(action);
        self.state = next;
        self.run_effects(effects);
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            debug!("running effect {effect:?}");
            match effect {
                Effect::ScheduleSplash(delay) => {
                    let tx = self.app_event_tx.clone();
                    let timer = self.runtime.spawn(async move {
                        tokio::time::sleep(delay).await;
                        tx.dispatch(Action::SplashElapsed);
                    });
                    if let Some(old) = self.splash_timer.replace(timer) {
                        old.abort();
                    }
                }
                Effect::SendPanic(draft) => {
                    let client = self.client.clone();
                    self.spawn_request(
                        RequestKind::Panic,
                        async move { client.send_panic(&draft).await },
                        |_| Action::RequestSucceeded(RequestKind::Panic),
                    );
                }
                Effect::SendAnomaly(draft) => {
                    let client = self.client.clone();
                    self.spawn_request(
                        RequestKind::Anomaly,
                        async move { client.send_anomaly(&draft).await },
                        |_| Action::RequestSucceeded(RequestKind::Anomaly),
                    );
                }
                Effect::SendEscalation(draft) => {
                    let client = self.client.clone();
                    self.spawn_request(
                        RequestKind::Escalation,
                        async move { client.send_escalation(&draft).await },
                        |_| Action::RequestSucceeded(RequestKind::Escalation),
                    );
                }
                Effect::FetchExplanation(anomaly_type) => {
                    let client = self.client.clone();
                    self.spawn_request(
                        RequestKind::Explanation,
                        async move { client.get_explanation(anomaly_type).await },
                        Action::ExplanationLoaded,
                    );
                }
                Effect::FetchGuidance { location, risk } => {
                    let client = self.client.clone();
                    self.spawn_request(
                        RequestKind::Guidance,
                        async move { client.get_guidance(&location, risk).await },
                        Action::GuidanceLoaded,
                    );
                }
                Effect::OpenLiveFeed(id) => self.open_live_feed(id),
                Effect::CloseLiveFeed(id) => {
                    if self.live.as_ref().is_some_and(|(held, _)| *held == id) {
                        if let Some((_, subscription)) = self.live.take() {
                            subscription.close();
                        }
                    }
                }
                Effect::StartVoice(listener) => {
                    let started = match &mut self.voice {
                        VoiceCapability::Available(recognizer) => {
                            let _guard = self.runtime.enter();
                            let tx = self.app_event_tx.clone();
                            recognizer
                                .start(Box::new(move |event| match event {
                                    RecognizerEvent::Results(results) => {
                                        tx.dispatch(Action::VoiceResults {
                                            listener,
                                            results,
                                            at: Instant::now(),
                                        });
                                    }
                                    RecognizerEvent::Ended => {
                                        tx.dispatch(Action::VoiceEnded(listener));
                                    }
                                }))
                                .map_err(|e| e.to_string())
                        }
                        VoiceCapability::Unavailable => Err("no recognizer configured".to_string()),
                    };
                    match started {
                        Ok(()) => info!("voice {listener} listening"),
                        Err(e) => {
                            warn!("voice {listener} failed to start: {e}");
                            self.dispatch(Action::VoiceStartFailed(listener));
                        }
                    }
                }
                Effect::StopVoice(listener) => {
                    if let VoiceCapability::Available(recognizer) = &mut self.voice {
                        recognizer.stop();
                    }
                    info!("voice {listener} stopped");
                }
            }
        }
    }

    /// Run one gateway call in the background and post its outcome back.
    fn spawn_request<T, Fut, F>(&self, kind: RequestKind, request: Fut, on_success: F)
    where
        T: Send + 'static,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
        F: FnOnce(T) -> Action + Send + 'static,
    {
        let tx = self.app_event_tx.clone();
        self.runtime.spawn(async move {
            match request.await {
                Ok(value) => tx.dispatch(on_success(value)),
                Err(e) => {
                    warn!("{kind:?} request failed: {e}");
                    tx.dispatch(Action::RequestFailed(kind));
                }
            }
        });
    }

    fn open_live_feed(&self, id: SubscriptionId) {
        let client = self.client.clone();
        let tx = self.app_event_tx.clone();
        self.runtime.spawn(async move {
            let alerts_tx = tx.clone();
            let subscribed = client
                .subscribe_alerts(move |alert| {
                    alerts_tx.dispatch(Action::AlertReceived {
                        subscription: id,
                        alert,
                    });
                })
                .await;
            match subscribed {
                Ok(subscription) => {
                    info!("live feed {id} connected to {}", subscription.url());
                    tx.dispatch(Action::LiveFeedConnected(id));
                    tx.send(AppEvent::LiveFeedReady { id, subscription });
                }
                Err(e) => {
                    warn!("live feed {id} failed: {e}");
                    tx.dispatch(Action::LiveFeedClosed(id));
                }
            }
        });
    }

    /// Notice a server-side close. There is no reconnect.
    fn check_live_feed(&mut self) {
        let closed = match &self.live {
            Some((id, subscription)) if subscription.is_closed() => Some(*id),
            _ => None,
        };
        if let Some(id) = closed {
            self.live = None;
            info!("live feed {id} ended");
            self.dispatch(Action::LiveFeedClosed(id));
        }
    }

    fn shutdown(&mut self) {
        if let Some(timer) = self.splash_timer.take() {
            timer.abort();
        }
        if let Some((_, subscription)) = self.live.take() {
            subscription.close();
        }
        if let VoiceCapability::Available(recognizer) = &mut self.voice {
            recognizer.stop();
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}
