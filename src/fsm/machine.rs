//! State machine engine
//!
//! Holds the single active behavior state for one entity and performs
//! guarded transitions. Entry and exit are the only points where
//! activation signals go out.

use ahash::AHashMap;

use crate::capability::Signal;
use crate::core::error::{Result, SkirmishError};
use crate::core::types::EntityId;
use crate::fsm::hook::StepHook;
use crate::fsm::state::{BehaviorState, BehaviorStateId, StateHost, Transition};

/// Bound on chained entry redirects within one transition
const MAX_ENTRY_REDIRECTS: usize = 4;

pub struct StateMachine<C> {
    owner: EntityId,
    current: Option<BehaviorStateId>,
    states: AHashMap<BehaviorStateId, Box<dyn BehaviorState<C>>>,
    hooks: Vec<Box<dyn StepHook<C>>>,
    /// Set for the duration of an exit/enter boundary
    in_transition: bool,
    /// Deferred request, applied at the start of the next step
    pending: Option<BehaviorStateId>,
    entered: u64,
    exited: u64,
}

impl<C: StateHost> StateMachine<C> {
    /// Create an empty machine. It has no current state until `start`.
    pub fn new(owner: EntityId) -> Self {
        Self {
            owner,
            current: None,
            states: AHashMap::new(),
            hooks: Vec::new(),
            in_transition: false,
            pending: None,
            entered: 0,
            exited: 0,
        }
    }

    /// Add a state to the catalog, replacing any state with the same id
    pub fn insert(&mut self, state: Box<dyn BehaviorState<C>>) {
        self.states.insert(state.id(), state);
    }

    pub fn with_state(mut self, state: impl BehaviorState<C> + 'static) -> Self {
        self.insert(Box::new(state));
        self
    }

    pub fn with_hook(mut self, hook: impl StepHook<C> + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn current(&self) -> Option<BehaviorStateId> {
        self.current
    }

    pub fn contains(&self, id: BehaviorStateId) -> bool {
        self.states.contains_key(&id)
    }

    pub fn is_terminal(&self) -> bool {
        self.current.is_some_and(|id| id.is_terminal())
    }

    /// (enter calls, exit calls) over the machine's lifetime
    pub fn transition_counts(&self) -> (u64, u64) {
        (self.entered, self.exited)
    }

    /// Enter the initial state
    pub fn start(&mut self, initial: BehaviorStateId, ctx: &mut C) -> Result<()> {
        self.change_state(initial, ctx)
    }

    /// Exit the current state (if any) and enter `next`.
    ///
    /// Re-entering the current state is allowed and runs the full
    /// exit/enter pair. Leaving a terminal state is refused.
    pub fn change_state(&mut self, next: BehaviorStateId, ctx: &mut C) -> Result<()> {
        if self.in_transition {
            return Err(SkirmishError::ReentrantTransition {
                current: self.current,
                requested: next,
            });
        }
        if !self.states.contains_key(&next) {
            return Err(SkirmishError::UnknownState(next));
        }
        if let Some(current) = self.current {
            if current.is_terminal() {
                return Err(SkirmishError::TerminalState(current));
            }
        }

        self.in_transition = true;
        let result = self.run_transition(next, ctx);
        self.in_transition = false;
        result
    }

    /// Pre-empt whatever is running, from outside the step loop.
    ///
    /// Used for asynchronous events such as death, which can land while
    /// any state is active. Entering a terminal state drops any deferred
    /// request.
    pub fn request_state_change(&mut self, next: BehaviorStateId, ctx: &mut C) -> Result<()> {
        self.change_state(next, ctx)?;
        if next.is_terminal() {
            self.pending = None;
        }
        Ok(())
    }

    /// Defer a transition to the start of the next step.
    ///
    /// A later request in the same tick replaces an earlier one.
    pub fn queue_state_change(&mut self, next: BehaviorStateId) {
        if self.is_terminal() {
            tracing::debug!(
                "{}: ignoring queued {:?}, machine is terminal",
                self.owner,
                next
            );
            return;
        }
        self.pending = Some(next);
    }

    /// Run one decision step of the active state.
    ///
    /// Hooks run around the state; the first hook or state that asks for a
    /// transition wins, and the transition happens after the step returns.
    pub fn step(&mut self, ctx: &mut C, dt: f32) -> Result<()> {
        if let Some(next) = self.pending.take() {
            self.change_state(next, ctx)?;
        }

        let Some(current) = self.current else {
            return Ok(());
        };

        let mut requested = Transition::Stay;
        for hook in self.hooks.iter_mut() {
            requested = hook.before_step(current, ctx);
            if requested != Transition::Stay {
                break;
            }
        }

        if requested == Transition::Stay {
            let state = self
                .states
                .get_mut(&current)
                .ok_or(SkirmishError::UnknownState(current))?;
            requested = state.step(ctx, dt);
        }

        if requested == Transition::Stay {
            for hook in self.hooks.iter_mut() {
                requested = hook.after_step(current, ctx);
                if requested != Transition::Stay {
                    break;
                }
            }
        }

        match requested {
            Transition::Stay => Ok(()),
            Transition::To(next) => self.change_state(next, ctx),
        }
    }

    fn run_transition(&mut self, next: BehaviorStateId, ctx: &mut C) -> Result<()> {
        let mut target = next;

        for _ in 0..=MAX_ENTRY_REDIRECTS {
            if let Some(previous) = self.current {
                if let Some(state) = self.states.get_mut(&previous) {
                    state.exit(ctx);
                }
                self.exited += 1;
                ctx.signal(Signal::StateExited(previous));
            }

            tracing::debug!("{}: {:?} -> {:?}", ctx.owner(), self.current, target);
            self.current = Some(target);

            let redirect = match self.states.get_mut(&target) {
                Some(state) => state.enter(ctx),
                None => return Err(SkirmishError::UnknownState(target)),
            };
            self.entered += 1;
            ctx.signal(Signal::StateEntered(target));

            match redirect {
                Transition::Stay => return Ok(()),
                Transition::To(redirected) => {
                    if !self.states.contains_key(&redirected) {
                        return Err(SkirmishError::UnknownState(redirected));
                    }
                    target = redirected;
                }
            }
        }

        Err(SkirmishError::TransitionLoop(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal host recording every signal
    struct Host {
        id: EntityId,
        signals: Vec<Signal>,
        script: Vec<Transition>,
    }

    impl Host {
        fn new() -> Self {
            Self {
                id: EntityId::new(),
                signals: Vec::new(),
                script: Vec::new(),
            }
        }
    }

    impl StateHost for Host {
        fn owner(&self) -> EntityId {
            self.id
        }
        fn signal(&mut self, signal: Signal) {
            self.signals.push(signal);
        }
    }

    /// State that plays back the host's scripted transitions
    struct Scripted(BehaviorStateId);

    impl BehaviorState<Host> for Scripted {
        fn id(&self) -> BehaviorStateId {
            self.0
        }
        fn step(&mut self, ctx: &mut Host, _dt: f32) -> Transition {
            if ctx.script.is_empty() {
                Transition::Stay
            } else {
                ctx.script.remove(0)
            }
        }
    }

    /// State whose entry always bounces to Idle
    struct Bouncer;

    impl BehaviorState<Host> for Bouncer {
        fn id(&self) -> BehaviorStateId {
            BehaviorStateId::MeleeAttack
        }
        fn enter(&mut self, _ctx: &mut Host) -> Transition {
            Transition::To(BehaviorStateId::Idle)
        }
        fn step(&mut self, _ctx: &mut Host, _dt: f32) -> Transition {
            Transition::Stay
        }
    }

    fn machine(host: &Host) -> StateMachine<Host> {
        StateMachine::new(host.id)
            .with_state(Scripted(BehaviorStateId::Idle))
            .with_state(Scripted(BehaviorStateId::Chase))
            .with_state(Scripted(BehaviorStateId::Death))
    }

    #[test]
    fn test_start_enters_without_exit() {
        let mut host = Host::new();
        let mut fsm = machine(&host);
        fsm.start(BehaviorStateId::Idle, &mut host).unwrap();

        assert_eq!(fsm.current(), Some(BehaviorStateId::Idle));
        assert_eq!(fsm.transition_counts(), (1, 0));
        assert_eq!(host.signals, vec![Signal::StateEntered(BehaviorStateId::Idle)]);
    }

    #[test]
    fn test_exit_runs_before_enter() {
        let mut host = Host::new();
        let mut fsm = machine(&host);
        fsm.start(BehaviorStateId::Idle, &mut host).unwrap();
        fsm.change_state(BehaviorStateId::Chase, &mut host).unwrap();

        assert_eq!(
            host.signals,
            vec![
                Signal::StateEntered(BehaviorStateId::Idle),
                Signal::StateExited(BehaviorStateId::Idle),
                Signal::StateEntered(BehaviorStateId::Chase),
            ]
        );
    }

    #[test]
    fn test_reentering_same_state_runs_full_bracket() {
        let mut host = Host::new();
        let mut fsm = machine(&host);
        fsm.start(BehaviorStateId::Chase, &mut host).unwrap();
        fsm.change_state(BehaviorStateId::Chase, &mut host).unwrap();

        assert_eq!(fsm.transition_counts(), (2, 1));
    }

    #[test]
    fn test_step_transition_applies_after_step() {
        let mut host = Host::new();
        let mut fsm = machine(&host);
        fsm.start(BehaviorStateId::Idle, &mut host).unwrap();
        host.script.push(Transition::To(BehaviorStateId::Chase));

        fsm.step(&mut host, 0.1).unwrap();
        assert_eq!(fsm.current(), Some(BehaviorStateId::Chase));
    }

    #[test]
    fn test_terminal_state_refuses_exit() {
        let mut host = Host::new();
        let mut fsm = machine(&host);
        fsm.start(BehaviorStateId::Death, &mut host).unwrap();

        let result = fsm.change_state(BehaviorStateId::Idle, &mut host);
        assert!(matches!(result, Err(SkirmishError::TerminalState(_))));
        assert_eq!(fsm.current(), Some(BehaviorStateId::Death));
    }

    #[test]
    fn test_unknown_state_rejected() {
        let mut host = Host::new();
        let mut fsm = machine(&host);
        fsm.start(BehaviorStateId::Idle, &mut host).unwrap();

        let result = fsm.change_state(BehaviorStateId::Roll, &mut host);
        assert!(matches!(result, Err(SkirmishError::UnknownState(_))));
        assert_eq!(fsm.current(), Some(BehaviorStateId::Idle));
    }

    #[test]
    fn test_entry_redirect_keeps_bracket() {
        let mut host = Host::new();
        let mut fsm = machine(&host).with_state(Bouncer);
        fsm.start(BehaviorStateId::Chase, &mut host).unwrap();
        fsm.change_state(BehaviorStateId::MeleeAttack, &mut host).unwrap();

        assert_eq!(fsm.current(), Some(BehaviorStateId::Idle));
        // Chase, MeleeAttack and Idle entered; Chase and MeleeAttack exited
        assert_eq!(fsm.transition_counts(), (3, 2));
    }

    #[test]
    fn test_queued_change_applies_on_next_step() {
        let mut host = Host::new();
        let mut fsm = machine(&host);
        fsm.start(BehaviorStateId::Idle, &mut host).unwrap();
        fsm.queue_state_change(BehaviorStateId::Chase);
        assert_eq!(fsm.current(), Some(BehaviorStateId::Idle));

        fsm.step(&mut host, 0.1).unwrap();
        assert_eq!(fsm.current(), Some(BehaviorStateId::Chase));
    }

    #[test]
    fn test_death_request_drops_queued_change() {
        let mut host = Host::new();
        let mut fsm = machine(&host);
        fsm.start(BehaviorStateId::Idle, &mut host).unwrap();
        fsm.queue_state_change(BehaviorStateId::Chase);
        fsm.request_state_change(BehaviorStateId::Death, &mut host).unwrap();

        fsm.step(&mut host, 0.1).unwrap();
        assert_eq!(fsm.current(), Some(BehaviorStateId::Death));
    }
}
