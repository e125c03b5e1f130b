// audio.rs - Ambient rain loop
//
// Browsers refuse autonomous playback before a user gesture, so the loop is
// loaded up front and armed until the first click or key press. The phase
// machine is pure and tested natively; the Web Audio glue is wasm-only.

/// Lifecycle of the ambient loop.
///
/// Idle -> Loading -> Armed -> Playing, with Closed reachable from anywhere
/// on teardown. Illegal transitions are ignored, which is what makes load
/// completions that arrive after teardown harmless.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Armed,
    Playing,
    Closed,
}

impl Phase {
    /// Idle -> Loading when the asset fetch is kicked off.
    pub fn begin_load(&mut self) -> bool {
        self.step(Phase::Idle, Phase::Loading)
    }

    /// Loading -> Armed once the asset is decoded and wired up.
    pub fn loaded(&mut self) -> bool {
        self.step(Phase::Loading, Phase::Armed)
    }

    /// Armed -> Playing on the first user gesture.
    pub fn gesture(&mut self) -> bool {
        self.step(Phase::Armed, Phase::Playing)
    }

    /// Any live phase -> Closed. Returns false if already closed.
    pub fn shutdown(&mut self) -> bool {
        if *self == Phase::Closed {
            return false;
        }
        *self = Phase::Closed;
        true
    }

    fn step(&mut self, from: Phase, to: Phase) -> bool {
        if *self != from {
            return false;
        }
        *self = to;
        true
    }
}

#[cfg(target_arch = "wasm32")]
pub use controller::AudioLoop;

#[cfg(target_arch = "wasm32")]
mod controller {
    use std::cell::RefCell;
    use std::rc::Rc;

    use js_sys::ArrayBuffer;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AudioBuffer, AudioBufferSourceNode, AudioContext, Response};

    use super::Phase;

    /// Loads, decodes and loops the ambient sound for one mount.
    pub struct AudioLoop {
        shared: Rc<RefCell<Shared>>,
    }

    struct Shared {
        phase: Phase,
        ctx: Option<AudioContext>,
        source: Option<AudioBufferSourceNode>,
        // Gesture closure stays allocated after detach; it is removed from
        // the event targets but must outlive its own final invocation.
        gesture: Option<Closure<dyn FnMut()>>,
    }

    impl AudioLoop {
        pub fn new() -> Self {
            Self {
                shared: Rc::new(RefCell::new(Shared {
                    phase: Phase::Idle,
                    ctx: None,
                    source: None,
                    gesture: None,
                })),
            }
        }

        /// Kick off the asset load. Failures downgrade to silence.
        pub fn start(&self, src: &str, volume: f64) {
            if !self.shared.borrow_mut().phase.begin_load() {
                return;
            }

            let shared = Rc::clone(&self.shared);
            let src = src.to_owned();
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(err) = load(&shared, &src, volume).await {
                    web_sys::console::warn_2(
                        &"rain-overlay: ambient loop unavailable".into(),
                        &err,
                    );
                }
            });
        }

        /// Stop playback and release audio resources. Safe from any phase.
        pub fn shutdown(&self) {
            let mut shared = self.shared.borrow_mut();
            if !shared.phase.shutdown() {
                return;
            }
            if let Some(source) = shared.source.take() {
                let _ = source.stop();
            }
            if let Some(ctx) = shared.ctx.take() {
                let _ = ctx.close();
            }
            if let Some(gesture) = shared.gesture.take() {
                detach_gesture(&gesture);
            }
        }
    }

    async fn load(shared: &Rc<RefCell<Shared>>, src: &str, volume: f64) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        let ctx = AudioContext::new()?;
        let gain = ctx.create_gain()?;
        gain.gain().set_value(volume as f32);
        gain.connect_with_audio_node(&ctx.destination())?;

        let response: Response = JsFuture::from(window.fetch_with_str(src)).await?.dyn_into()?;
        let raw = JsFuture::from(response.array_buffer()?).await?;
        let raw: ArrayBuffer = raw.dyn_into()?;
        let decoded = JsFuture::from(ctx.decode_audio_data(&raw)?).await?;
        let buffer: AudioBuffer = decoded.dyn_into()?;

        // Teardown may have happened while the fetch was in flight; the
        // phase machine rejects the transition and we abandon the load.
        if !shared.borrow_mut().phase.loaded() {
            let _ = ctx.close();
            return Ok(());
        }

        let source = ctx.create_buffer_source()?;
        source.set_buffer(Some(&buffer));
        source.set_loop(true);
        source.connect_with_audio_node(&gain)?;

        let gesture = {
            let shared = Rc::clone(shared);
            Closure::<dyn FnMut()>::new(move || {
                let mut s = shared.borrow_mut();
                if !s.phase.gesture() {
                    return;
                }
                if let (Some(ctx), Some(source)) = (&s.ctx, &s.source) {
                    let _ = ctx.resume();
                    let _ = source.start();
                }
                if let Some(gesture) = &s.gesture {
                    detach_gesture(gesture);
                }
            })
        };

        let cb = gesture.as_ref().unchecked_ref();
        window.add_event_listener_with_callback("click", cb)?;
        window.add_event_listener_with_callback("keydown", cb)?;

        let mut s = shared.borrow_mut();
        s.ctx = Some(ctx);
        s.source = Some(source);
        s.gesture = Some(gesture);
        Ok(())
    }

    fn detach_gesture(gesture: &Closure<dyn FnMut()>) {
        if let Some(window) = web_sys::window() {
            let cb = gesture.as_ref().unchecked_ref();
            let _ = window.remove_event_listener_with_callback("click", cb);
            let _ = window.remove_event_listener_with_callback("keydown", cb);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Phase;

    #[test]
    fn happy_path_runs_idle_to_playing() {
        let mut phase = Phase::Idle;
        assert!(phase.begin_load());
        assert!(phase.loaded());
        assert!(phase.gesture());
        assert_eq!(phase, Phase::Playing);
    }

    #[test]
    fn gesture_before_load_completes_is_ignored() {
        let mut phase = Phase::Loading;
        assert!(!phase.gesture());
        assert_eq!(phase, Phase::Loading);
    }

    #[test]
    fn load_completion_after_shutdown_is_a_no_op() {
        let mut phase = Phase::Loading;
        assert!(phase.shutdown());
        assert!(!phase.loaded());
        assert_eq!(phase, Phase::Closed);
    }

    #[test]
    fn shutdown_reaches_closed_from_every_phase() {
        for start in [Phase::Idle, Phase::Loading, Phase::Armed, Phase::Playing] {
            let mut phase = start;
            assert!(phase.shutdown());
            assert_eq!(phase, Phase::Closed);
        }
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut phase = Phase::Playing;
        assert!(phase.shutdown());
        assert!(!phase.shutdown());
    }

    #[test]
    fn second_gesture_does_not_restart_playback() {
        let mut phase = Phase::Armed;
        assert!(phase.gesture());
        assert!(!phase.gesture());
        assert_eq!(phase, Phase::Playing);
    }

    #[test]
    fn double_load_is_rejected() {
        let mut phase = Phase::Idle;
        assert!(phase.begin_load());
        assert!(!phase.begin_load());
    }
}
