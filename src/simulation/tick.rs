//! Tick system - orchestrates sandbox updates
//!
//! Each tick advances the world one step:
//! resources -> perception -> cognition and behavior -> movement

use serde::Serialize;

use crate::behavior::Surroundings;
use crate::cognition::collaborators::Explorer;
use crate::core::types::{EntityId, SimTime};
use crate::entity::thoughts::CognitionEvent;
use crate::world::{PeerView, World};

/// A cognition event tagged with who had it and when
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentEvent {
    pub agent: EntityId,
    pub time: SimTime,
    pub event: CognitionEvent,
}

/// Run a single simulation tick
///
/// 1. Advance the clock and regrow fruit trees
/// 2. Perception: every agent is told about entities that just came into sight
/// 3. Cognition: every agent ticks its brain and behavior state, borrowing
///    its body and a read-only view of every other agent
/// 4. Movement: bodies walk toward their targets and mark explored chunks
///
/// Returns everything the agents thought this tick.
pub fn run_simulation_tick(world: &mut World, dt: f32) -> Vec<AgentEvent> {
    let now = world.advance_clock(dt);
    world.update_resources();

    update_perception(world, now);
    let events = update_agents(world, now, dt);
    update_movement(world, dt);

    tracing::trace!(time = now, events = events.len(), "tick complete");
    events
}

fn update_perception(world: &mut World, now: SimTime) {
    for index in 0..world.agents().len() {
        let seen = world.visible_from(index);
        let (agents, bodies) = world.parts_mut();
        let fresh = bodies[index].sensor.scan(seen);
        if !fresh.is_empty() {
            agents[index].perceive(fresh, now);
        }
    }
}

fn update_agents(world: &mut World, now: SimTime, dt: f32) -> Vec<AgentEvent> {
    let mut events = Vec::new();
    for index in 0..world.agents().len() {
        let adjacent = world.adjacent_to(index);
        let nearby = world.peers_near(index);

        let (agents, bodies) = world.parts_mut();
        let Some((agent, peers)) = PeerView::split(agents, index) else {
            continue;
        };
        let body = &mut bodies[index];
        body.locomotion.set_speed_multiplier(agent.speed_multiplier());

        let mut surroundings = Surroundings::new()
            .with_mover(&mut body.locomotion)
            .with_perception(&mut body.sensor)
            .with_explorer(&mut body.explorer)
            .with_adjacent(&adjacent)
            .with_peers(&nearby, &peers);

        let agent_id = agent.id();
        events.extend(
            agent
                .tick(now, dt, &mut surroundings)
                .into_iter()
                .map(|event| AgentEvent { agent: agent_id, time: now, event }),
        );
    }
    events
}

fn update_movement(world: &mut World, dt: f32) {
    let (agents, bodies) = world.parts_mut();
    for (agent, body) in agents.iter_mut().zip(bodies.iter_mut()) {
        let position = body.locomotion.step(dt);
        agent.position = position;
        body.explorer.mark_visited(position);
    }
}
