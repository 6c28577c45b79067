//! The `Bot` boundary (`spec.md` §4.6, §9 "Controller dynamic dispatch"):
//! a request/response function plus a disposal hook, open to whatever
//! transport a concrete deployment needs.
//!
//! `photon-core` never sees this trait -- it is the seam `photon-bot` adds
//! on top of the bot-agnostic simulation engine, mirroring the way
//! `nomai-wasm-host` kept its sandboxed-module boundary in its own crate
//! rather than folding it into `nomai-ecs`.

use photon_schema::{ControllerState, Request};

use crate::error::BotError;

/// One live controller endpoint. A `Bot` is a function from [`Request`] to
/// `ControllerState | null`, per `spec.md` §4.6: a `null` response is valid
/// only when `request.ship_id` is `None`.
pub trait Bot: Send {
    /// Send one request and block for its response, subject to whatever
    /// timeout the implementation enforces. Any transport failure, decode
    /// failure, or exceeded timeout surfaces as a [`BotError`] -- always
    /// locally recoverable by the caller (`spec.md` §7).
    fn call(&mut self, request: &Request) -> Result<Option<ControllerState>, BotError>;

    /// Best-effort graceful shutdown. Called exactly once per bot over its
    /// lifetime, whether the match ran to completion or the bot was
    /// unbound early after a transport failure (`spec.md` §5).
    fn close(&mut self) -> Result<(), BotError>;
}

/// An in-process `Bot` driven by a plain closure -- no channel, no
/// subprocess. Useful for test harnesses and for drivers that want to run a
/// reference bot in the same address space as the engine.
pub struct ScriptedBot<F>
where
    F: FnMut(&Request) -> Option<ControllerState> + Send,
{
    script: F,
}

impl<F> ScriptedBot<F>
where
    F: FnMut(&Request) -> Option<ControllerState> + Send,
{
    pub fn new(script: F) -> Self {
        Self { script }
    }
}

impl<F> Bot for ScriptedBot<F>
where
    F: FnMut(&Request) -> Option<ControllerState> + Send,
{
    fn call(&mut self, request: &Request) -> Result<Option<ControllerState>, BotError> {
        Ok((self.script)(request))
    }

    fn close(&mut self) -> Result<(), BotError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photon_schema::{SpaceCreate, Step, StepData};
    use photon_schema::vector::Vec2;

    fn sample_request(ship_id: Option<u64>) -> Request {
        Request {
            step: Step {
                clock: 0,
                duration: 0.0,
                data: StepData::Space(SpaceCreate {
                    dimensions: Vec2::new(10.0, 10.0),
                    gravity: 0.0,
                    lifetime: None,
                }),
            },
            ship_id,
        }
    }

    #[test]
    fn scripted_bot_returns_whatever_the_closure_returns() {
        let mut bot = ScriptedBot::new(|_req: &Request| {
            Some(ControllerState {
                fire: true,
                rotate: -1.0,
                thrust: 1.0,
            })
        });
        let response = bot.call(&sample_request(Some(3))).unwrap();
        assert_eq!(
            response,
            Some(ControllerState {
                fire: true,
                rotate: -1.0,
                thrust: 1.0
            })
        );
        bot.close().unwrap();
    }

    #[test]
    fn scripted_bot_may_answer_null_for_the_hello_request() {
        let mut bot = ScriptedBot::new(|_req: &Request| None);
        let response = bot.call(&sample_request(None)).unwrap();
        assert_eq!(response, None);
    }
}
