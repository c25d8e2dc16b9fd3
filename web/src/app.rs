use bitflags::bitflags;
use clap::Args;
use gloo::events::EventListener;
use gloo::timers::callback::Interval;
use memory_core::{
    AssetLoader, BoardLayout, InputEvent, MemoryConfig, MemoryController, TickOutcome,
};
use web_sys::HtmlCanvasElement;
use web_time::Instant;
use yew::prelude::*;

use crate::canvas::CanvasSurface;
use crate::fetch::{self, BrowserAssets};
use crate::utils::js_random_seed;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq)]
    struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

type Session = MemoryController<BrowserAssets>;

async fn load_session(config: MemoryConfig, seed: u64) -> memory_core::Result<Session> {
    let manifest = fetch::load_manifest().await?;
    let faces = manifest.card_faces(config.pair_count())?;
    let assets = BrowserAssets::prefetch(&faces).await;
    MemoryController::with_faces(config, faces, AssetLoader::new(assets), seed, Instant::now())
}

pub(crate) enum Msg {
    Loaded(Result<Box<Session>, String>),
    Tick,
    Input(InputEvent),
}

enum Stage {
    Loading,
    Running(Box<Session>),
    Failed(String),
    Closed,
}

impl Stage {
    /// Loading and running sessions still need ticks, failed and closed ones never will.
    fn needs_ticks(&self) -> bool {
        matches!(self, Stage::Loading | Stage::Running(_))
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct AppProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,
}

pub(crate) struct MemoryApp {
    config: MemoryConfig,
    stage: Stage,
    canvas: NodeRef,
    pending: Vec<InputEvent>,
    ticker: Option<Interval>,
    _pagehide: EventListener,
}

impl MemoryApp {
    fn create_ticker(ctx: &Context<Self>, config: &MemoryConfig) -> Interval {
        let link = ctx.link().clone();
        let millis = config.tick_interval().as_millis().max(1) as u32;
        Interval::new(millis, move || link.send_message(Msg::Tick))
    }

    fn listen_pagehide(ctx: &Context<Self>) -> EventListener {
        let link = ctx.link().clone();
        EventListener::new(&gloo::utils::window(), "pagehide", move |_| {
            link.send_message(Msg::Input(InputEvent::Close))
        })
    }

    fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
        if !self.stage.needs_ticks() && self.ticker.take().is_some() {
            log::debug!("ticker stopped");
        }
    }

    fn tick(&mut self) -> bool {
        let Stage::Running(session) = &mut self.stage else {
            self.pending.clear();
            return false;
        };
        let Some(mut surface) = self
            .canvas
            .cast::<HtmlCanvasElement>()
            .and_then(|canvas| CanvasSurface::from_canvas(&canvas))
        else {
            return false;
        };

        let result = session.tick(self.pending.drain(..), Instant::now(), &mut surface);

        match result {
            Ok(TickOutcome::Running | TickOutcome::Announcing) => false,
            Ok(TickOutcome::Stopped) => {
                log::info!("session closed");
                self.set_stage(Stage::Closed);
                true
            }
            Err(err) => {
                log::error!("game stopped: {}", err);
                self.set_stage(Stage::Failed(err.to_string()));
                true
            }
        }
    }
}

impl Component for MemoryApp {
    type Message = Msg;
    type Properties = AppProps;

    fn create(ctx: &Context<Self>) -> Self {
        let config = MemoryConfig::default();
        let seed = ctx.props().seed.unwrap_or_else(js_random_seed);
        let link = ctx.link().clone();
        wasm_bindgen_futures::spawn_local(async move {
            let loaded = load_session(config, seed)
                .await
                .map(Box::new)
                .map_err(|err| err.to_string());
            link.send_message(Msg::Loaded(loaded));
        });

        Self {
            config,
            stage: Stage::Loading,
            canvas: NodeRef::default(),
            pending: Vec::new(),
            ticker: Some(Self::create_ticker(ctx, &config)),
            _pagehide: Self::listen_pagehide(ctx),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Loaded(Ok(session)) => {
                log::debug!("cards loaded");
                self.set_stage(Stage::Running(session));
                true
            }
            Loaded(Err(err)) => {
                log::error!("could not start game: {}", err);
                self.set_stage(Stage::Failed(err));
                true
            }
            Tick => self.tick(),
            Input(event) => {
                log::trace!("queued {:?}", event);
                self.pending.push(event);
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let layout = BoardLayout::new(&self.config);

        let onmousedown = ctx.link().batch_callback(|e: MouseEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            buttons.contains(MouseButtons::LEFT).then(|| {
                Msg::Input(InputEvent::PointerPress {
                    x: e.offset_x(),
                    y: e.offset_y(),
                })
            })
        });

        let status = match &self.stage {
            Stage::Loading => html! { <p class="status">{"Loading cards…"}</p> },
            Stage::Running(_) => html! {},
            Stage::Failed(err) => html! { <p class="error">{err}</p> },
            Stage::Closed => html! { <p class="status">{"Game closed"}</p> },
        };

        html! {
            <div class="memory" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <canvas
                    ref={self.canvas.clone()}
                    width={layout.width().to_string()}
                    height={layout.height().to_string()}
                    hidden={!matches!(self.stage, Stage::Running(_))}
                    {onmousedown}
                />
                {status}
            </div>
        }
    }
}
