use std::cell::RefCell;
use std::rc::Rc;

use sprig_engine::canvas::Canvas;
use sprig_engine::core::{App, AppControl, FrameCtx};
use sprig_host::{EngineContext, HostError};

/// Shared slot for the error that stopped the loop.
pub type Failure = Rc<RefCell<Option<HostError>>>;

/// Bridges the window runtime to a booted project.
pub struct PlayerApp {
    canvas: Rc<RefCell<Canvas>>,
    engine: EngineContext<Canvas>,
    failure: Failure,
}

impl PlayerApp {
    pub fn new(canvas: Rc<RefCell<Canvas>>, engine: EngineContext<Canvas>) -> Self {
        Self { canvas, engine, failure: Rc::new(RefCell::new(None)) }
    }

    /// Handle to read the fatal error, if any, after the loop returns.
    pub fn failure(&self) -> Failure {
        Rc::clone(&self.failure)
    }
}

impl App for PlayerApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.canvas.borrow_mut().begin_frame(ctx.keyboard());

        // Reported once by `main` after the loop unwinds.
        if let Err(err) = self.engine.frame(ctx.time.dt) {
            *self.failure.borrow_mut() = Some(err);
            return AppControl::Exit;
        }

        let mut canvas = self.canvas.borrow_mut();
        ctx.render(|rctx, target| canvas.render(rctx, target))
    }
}
