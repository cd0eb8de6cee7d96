//! The game session state machine.
//!
//! ```text
//! WaitingForPlayers -> Configuration -> Nominate <-> Vote -> Quest
//!                                          ^                   |
//!                                          +-------------------+
//!                            Quest -> Assassination -> End(Good | Evil)
//!                            Quest -> End(Evil),  Vote -> End(Evil)
//! ```
//!
//! Every operation is synchronous and either applies completely or leaves
//! the session untouched. Out-of-phase calls fail with `WrongPhase`.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::event::{Event, InspectionReport, RoleReveal, StartReveal, Status};
use super::phase::{Ballot, Party, Phase, PhaseKind, Round, WinReason};
use super::record::QuestRecord;
use crate::core::config::{Configuration, Rule};
use crate::core::error::{GameError, PartyError, SnapshotError};
use crate::core::player::{PlayerId, Roster, MIN_PLAYERS};
use crate::core::rng::GameRng;
use crate::roles::{self, Alignment, RoleAssignment};
use crate::rules::{self, VoteOutcome, QUESTS_TO_WIN, VOTE_TRACK_LIMIT};

/// The inspection token and who has held it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct InspectionToken {
    holder: PlayerId,
    previous: Vec<PlayerId>,
    used_in_quest: Option<u8>,
}

/// One game, from lobby to result.
///
/// Sessions are independent: each owns its roster, configuration and RNG.
/// Callers serialize access to a session; the engine does no locking.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSession {
    roster: Roster,
    config: Configuration,
    phase: Phase,
    roles: Option<RoleAssignment>,
    history: Vector<QuestRecord>,
    inspection: Option<InspectionToken>,
    rng: GameRng,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Create a session seeded from entropy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(GameRng::from_entropy())
    }

    /// Create a session with a fixed seed, for replays and tests.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(GameRng::new(seed))
    }

    fn with_rng(rng: GameRng) -> Self {
        Self {
            roster: Roster::new(),
            config: Configuration::new(),
            phase: Phase::WaitingForPlayers,
            roles: None,
            history: Vector::new(),
            inspection: None,
            rng,
        }
    }

    // === Lobby ===

    /// Add a player to the lobby.
    pub fn add_player(&mut self, name: &str) -> Result<Event, GameError> {
        self.require(PhaseKind::WaitingForPlayers, "join")?;
        let player = self.roster.add(name)?;
        let roster_size = self.roster.len();

        debug!(roster_size, "player joined");
        Ok(Event::PlayerJoined {
            player,
            roster_size,
            ready: roster_size >= MIN_PLAYERS,
        })
    }

    /// Close the lobby and move to configuration.
    pub fn request_config_close(&mut self) -> Result<Event, GameError> {
        self.require(PhaseKind::WaitingForPlayers, "close the lobby")?;
        let roster_size = self.roster.len();
        if roster_size < MIN_PLAYERS {
            return Err(GameError::InsufficientPlayers {
                what: "closing the lobby",
                required: MIN_PLAYERS,
                actual: roster_size,
            });
        }

        self.phase = Phase::Configuration;
        info!(roster_size, "lobby closed");
        Ok(Event::LobbyClosed { roster_size })
    }

    // === Configuration ===

    /// Strictly enable a rule by name.
    pub fn enable_rule(&mut self, name: &str) -> Result<Rule, GameError> {
        self.require_setup("change the rules")?;
        self.config.enable_named(name, self.roster.len())
    }

    /// Best-effort enable of several rules; returns those newly enabled.
    pub fn enable_rules<S: AsRef<str>>(&mut self, names: &[S]) -> Result<Vec<Rule>, GameError> {
        self.require_setup("change the rules")?;
        Ok(self.config.enable_many(names, self.roster.len()))
    }

    /// Disable a rule by name.
    pub fn disable_rule(&mut self, name: &str) -> Result<Rule, GameError> {
        self.require_setup("change the rules")?;
        self.config.disable_named(name)
    }

    /// Best-effort disable of several rules.
    pub fn disable_rules<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), GameError> {
        self.require_setup("change the rules")?;
        self.config.disable_many(names);
        Ok(())
    }

    /// Enabled rules for display, or `"none"`.
    #[must_use]
    pub fn describe_rules(&self) -> String {
        self.config.describe()
    }

    #[must_use]
    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Validate the rules, assign roles and open the first quest.
    ///
    /// The returned reveals are private per player; the caller delivers each
    /// one only to its player.
    pub fn request_start(&mut self) -> Result<StartReveal, GameError> {
        self.require(PhaseKind::Configuration, "start the game")?;
        let roster_size = self.roster.len();
        self.config.validate(roster_size)?;

        let assignment = roles::assign(roster_size, &self.config, &mut self.rng);
        let knowledge = roles::resolve(&assignment.roles, assignment.inspector, roster_size, &mut self.rng);
        let reveals = self
            .roster
            .ids()
            .map(|player| RoleReveal {
                player,
                alignment: assignment.roles.alignment(player),
                role: assignment.roles.role_of(player),
                knowledge: knowledge.private(player).to_vec(),
            })
            .collect();

        let round = Round::start(1, assignment.leader);
        self.inspection = assignment.inspector.map(|holder| InspectionToken {
            holder,
            previous: Vec::new(),
            used_in_quest: None,
        });
        self.roles = Some(assignment.roles);
        self.phase = Phase::Nominate(round);

        info!(roster_size, rules = %self.config, "game started");
        Ok(StartReveal {
            reveals,
            public: knowledge.public().to_vec(),
            rules: self.config.enabled().collect(),
            opening: self.leader_up(round),
        })
    }

    /// Re-deliver a player's private reveal.
    ///
    /// Knowledge is resolved afresh, so the confidant's pair is reshuffled.
    pub fn reveal_to(&mut self, name: &str) -> Result<RoleReveal, GameError> {
        let roles = match &self.roles {
            Some(roles) => roles,
            None => return Err(self.wrong_phase("reveal roles")),
        };
        let player = self.roster.resolve(name)?;
        let inspector = self.inspection.as_ref().map(|t| t.holder);
        let knowledge = roles::resolve(roles, inspector, self.roster.len(), &mut self.rng);

        Ok(RoleReveal {
            player,
            alignment: roles.alignment(player),
            role: roles.role_of(player),
            knowledge: knowledge.private(player).to_vec(),
        })
    }

    // === Quests ===

    /// The leader proposes a party for the current quest.
    pub fn nominate<S: AsRef<str>>(&mut self, party: &[S]) -> Result<Event, GameError> {
        let round = match &self.phase {
            Phase::Nominate(round) => *round,
            _ => return Err(self.wrong_phase("nominate a party")),
        };
        let members = self.resolve_party(party, round.quest)?;

        debug!(quest = round.quest, size = members.len(), "party nominated");
        let event = Event::PartyNominated {
            leader: round.leader,
            party: members.to_vec(),
        };
        self.phase = Phase::Vote {
            round,
            ballot: Ballot::new(members, self.roster.len()),
        };
        Ok(event)
    }

    /// Record one player's approve/reject vote; resolves once all are in.
    pub fn cast_vote(&mut self, name: &str, approve: bool) -> Result<Vec<Event>, GameError> {
        let (round, ballot) = match &mut self.phase {
            Phase::Vote { round, ballot } => (*round, ballot),
            other => {
                return Err(GameError::WrongPhase {
                    action: "vote",
                    phase: other.kind(),
                })
            }
        };
        let voter = self.roster.resolve(name)?;
        if !ballot.cast(voter, approve) {
            return Err(GameError::AlreadyVoted(name.to_string()));
        }

        let roster_size = self.roster.len();
        let remaining = roster_size - ballot.cast_count();
        debug!(remaining, "vote cast");
        let mut events = vec![Event::VoteCast { voter, remaining }];
        if remaining > 0 {
            return Ok(events);
        }

        let votes: Vec<(PlayerId, bool)> = ballot.choices().collect();
        let party = ballot.party.clone();
        let choices: Vec<bool> = votes.iter().map(|&(_, v)| v).collect();
        let outcome = rules::tally_votes(&choices);

        match outcome {
            VoteOutcome::Approved => {
                info!(quest = round.quest, "party approved");
                events.push(Event::NominationResolved {
                    outcome,
                    votes,
                    vote_track: 0,
                });
                self.phase = Phase::Quest {
                    round: Round {
                        vote_track: 0,
                        ..round
                    },
                    ballot: Ballot::new(party, roster_size),
                };
            }
            VoteOutcome::Rejected => {
                let vote_track = round.vote_track + 1;
                info!(quest = round.quest, vote_track, "party rejected");
                events.push(Event::NominationResolved {
                    outcome,
                    votes,
                    vote_track,
                });

                if vote_track >= VOTE_TRACK_LIMIT {
                    events.push(self.finish(Alignment::Evil, WinReason::VoteTrackExhausted));
                } else {
                    let next = Round {
                        quest: round.quest,
                        leader: round.leader.next(roster_size),
                        vote_track,
                    };
                    self.phase = Phase::Nominate(next);
                    events.push(self.leader_up(next));
                }
            }
        }

        Ok(events)
    }

    /// Record one party member's secret success/fail; resolves once all are in.
    pub fn cast_quest_action(&mut self, name: &str, succeed: bool) -> Result<Vec<Event>, GameError> {
        let (round, ballot) = match &mut self.phase {
            Phase::Quest { round, ballot } => (*round, ballot),
            other => {
                return Err(GameError::WrongPhase {
                    action: "act on a quest",
                    phase: other.kind(),
                })
            }
        };
        let member = self.roster.resolve(name)?;
        if !ballot.party.contains(&member) {
            return Err(GameError::NotInParty(name.to_string()));
        }
        if ballot.has_cast(member) {
            return Err(GameError::AlreadyVoted(name.to_string()));
        }
        ballot.cast(member, succeed);
        let remaining = ballot.party.len() - ballot.cast_count();
        let mut events = vec![Event::QuestActionCast { member, remaining }];
        if remaining > 0 {
            return Ok(events);
        }

        let actions: Vec<bool> = ballot.choices().map(|(_, c)| c).collect();
        let party = ballot.party.to_vec();
        let roster_size = self.roster.len();
        let outcome = rules::tally_quest(&actions, rules::required_fails(roster_size, round.quest));
        let record = QuestRecord {
            quest: round.quest,
            party_size: party.len(),
            leader: round.leader,
            party,
            fails: actions.iter().filter(|&&a| !a).count(),
            outcome,
        };

        info!(quest = round.quest, ?outcome, "quest resolved");
        self.history.push_back(record.clone());
        events.push(Event::QuestResolved(record));

        if self.successes() >= QUESTS_TO_WIN {
            info!("good completed three quests");
            self.phase = Phase::Assassination;
            events.push(Event::AssassinationBegins);
        } else if self.failures() >= QUESTS_TO_WIN {
            events.push(self.finish(Alignment::Evil, WinReason::QuestsFailed));
        } else {
            let next = Round::start(round.quest + 1, round.leader.next(roster_size));
            self.phase = Phase::Nominate(next);
            events.push(self.leader_up(next));
        }

        Ok(events)
    }

    /// The hunter names a Good player; naming the seer wins for Evil.
    pub fn cast_assassination(&mut self, target: &str) -> Result<Event, GameError> {
        self.require(PhaseKind::Assassination, "assassinate")?;
        let roles = self.roles_in_play();
        let victim = self
            .roster
            .find(target)
            .filter(|&p| roles.alignment(p) == Alignment::Good)
            .ok_or_else(|| GameError::InvalidTarget(target.to_string()))?;

        let (winner, reason) = if victim == roles.seer() {
            (Alignment::Evil, WinReason::SeerFound)
        } else {
            (Alignment::Good, WinReason::SeerSurvived)
        };
        Ok(self.finish(winner, reason))
    }

    /// The token holder learns the target's alignment and passes them the token.
    ///
    /// Allowed while nominating for quests 2-5, once per quest, never on the
    /// holder or anyone who held the token before.
    pub fn use_inspection(&mut self, target: &str) -> Result<InspectionReport, GameError> {
        let quest = match &self.phase {
            Phase::Nominate(round) => round.quest,
            _ => return Err(self.wrong_phase("use the inspection token")),
        };
        let token = self
            .inspection
            .as_ref()
            .ok_or(GameError::InspectionUnavailable("the inspection rule is not in play"))?;
        if quest < 2 {
            return Err(GameError::InspectionUnavailable("not before the second quest"));
        }
        if token.used_in_quest == Some(quest) {
            return Err(GameError::InspectionUnavailable("already used this quest"));
        }

        let target_id = self.roster.resolve(target)?;
        if target_id == token.holder || token.previous.contains(&target_id) {
            return Err(GameError::InvalidInspectionTarget(target.to_string()));
        }
        let holder = token.holder;
        let alignment = self.roles_in_play().alignment(target_id);

        if let Some(token) = self.inspection.as_mut() {
            token.previous.push(holder);
            token.holder = target_id;
            token.used_in_quest = Some(quest);
        }

        info!(quest, "inspection token used");
        Ok(InspectionReport {
            alignment,
            event: Event::InspectionUsed {
                holder,
                target: target_id,
            },
        })
    }

    // === Queries ===

    /// Current phase and a human-readable description.
    #[must_use]
    pub fn status(&self) -> Status {
        let kind = self.phase.kind();
        let mut description = kind.description().to_string();

        let detail = match &self.phase {
            Phase::WaitingForPlayers => format!(" {} joined so far.", self.roster.len()),
            Phase::Nominate(round) | Phase::Vote { round, .. } | Phase::Quest { round, .. } => {
                format!(
                    " Quest {}, leader {}, vote track {}/{}; {} succeeded, {} failed.",
                    round.quest,
                    self.roster.name(round.leader),
                    round.vote_track,
                    VOTE_TRACK_LIMIT,
                    self.successes(),
                    self.failures(),
                )
            }
            Phase::End { winner, reason } => format!(" {} wins: {}.", winner, reason),
            Phase::Configuration => format!(" Rules: {}.", self.config),
            Phase::Assassination => String::new(),
        };
        description.push_str(&detail);

        Status {
            phase: kind,
            description,
        }
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Player names in join order.
    #[must_use]
    pub fn list_roster(&self) -> &[String] {
        self.roster.names()
    }

    /// Current quest index while a quest is underway.
    #[must_use]
    pub fn current_quest(&self) -> Option<u8> {
        self.phase.round().map(|r| r.quest)
    }

    /// Consecutive rejections this quest; 0 outside quests.
    #[must_use]
    pub fn vote_track(&self) -> u8 {
        self.phase.round().map_or(0, |r| r.vote_track)
    }

    #[must_use]
    pub fn leader(&self) -> Option<PlayerId> {
        self.phase.round().map(|r| r.leader)
    }

    /// The nominated or approved party, if one exists.
    #[must_use]
    pub fn party(&self) -> Option<&[PlayerId]> {
        self.phase.party().map(|p| p.as_slice())
    }

    /// Resolved quests, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<QuestRecord> {
        &self.history
    }

    #[must_use]
    pub fn successes(&self) -> usize {
        self.history.iter().filter(|r| r.succeeded()).count()
    }

    #[must_use]
    pub fn failures(&self) -> usize {
        self.history.len() - self.successes()
    }

    #[must_use]
    pub fn winner(&self) -> Option<Alignment> {
        match self.phase {
            Phase::End { winner, .. } => Some(winner),
            _ => None,
        }
    }

    /// The role assignment, once the game has started.
    #[must_use]
    pub fn roles(&self) -> Option<&RoleAssignment> {
        self.roles.as_ref()
    }

    /// Current inspection token holder.
    #[must_use]
    pub fn inspector(&self) -> Option<PlayerId> {
        self.inspection.as_ref().map(|t| t.holder)
    }

    // === Snapshots ===

    /// Encode the full session, RNG position included.
    pub fn snapshot(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(SnapshotError::Encode)
    }

    /// Restore a session from `snapshot` output.
    pub fn restore(bytes: &[u8]) -> Result<Self, SnapshotError> {
        bincode::deserialize(bytes).map_err(SnapshotError::Decode)
    }

    // === Internals ===

    fn require(&self, kind: PhaseKind, action: &'static str) -> Result<(), GameError> {
        if self.phase.kind() == kind {
            Ok(())
        } else {
            Err(self.wrong_phase(action))
        }
    }

    fn require_setup(&self, action: &'static str) -> Result<(), GameError> {
        match self.phase {
            Phase::WaitingForPlayers | Phase::Configuration => Ok(()),
            _ => Err(self.wrong_phase(action)),
        }
    }

    fn wrong_phase(&self, action: &'static str) -> GameError {
        GameError::WrongPhase {
            action,
            phase: self.phase.kind(),
        }
    }

    fn roles_in_play(&self) -> &RoleAssignment {
        self.roles
            .as_ref()
            .expect("roles are assigned when the game starts")
    }

    fn leader_up(&self, round: Round) -> Event {
        Event::LeaderUp {
            quest: round.quest,
            leader: round.leader,
            party_size: rules::required_party_size(self.roster.len(), round.quest),
            vote_track: round.vote_track,
        }
    }

    fn resolve_party<S: AsRef<str>>(&self, names: &[S], quest: u8) -> Result<Party, GameError> {
        let mut party = Party::new();
        for name in names {
            let name = name.as_ref();
            let player = self
                .roster
                .find(name)
                .ok_or_else(|| PartyError::UnknownMember(name.to_string()))?;
            if party.contains(&player) {
                return Err(PartyError::DuplicateMember(name.to_string()).into());
            }
            party.push(player);
        }

        let expected = rules::required_party_size(self.roster.len(), quest);
        if party.len() != expected {
            return Err(PartyError::WrongSize {
                expected,
                actual: party.len(),
            }
            .into());
        }
        Ok(party)
    }

    fn finish(&mut self, winner: Alignment, reason: WinReason) -> Event {
        let seer = self.roles_in_play().seer();
        self.phase = Phase::End { winner, reason };
        info!(%winner, %reason, "game over");
        Event::GameOver {
            winner,
            reason,
            seer,
        }
    }
}

/// Builder for sessions with players and rules preloaded.
#[derive(Clone, Debug, Default)]
pub struct SessionBuilder {
    seed: Option<u64>,
    players: Vec<String>,
    rules: Vec<String>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the RNG seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn player(mut self, name: impl Into<String>) -> Self {
        self.players.push(name.into());
        self
    }

    pub fn players<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.players.extend(names.into_iter().map(Into::into));
        self
    }

    /// Rules to enable best-effort once all players have joined.
    pub fn rules<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.extend(names.into_iter().map(Into::into));
        self
    }

    /// Build the session, still in the lobby.
    pub fn build(self) -> Result<GameSession, GameError> {
        let mut session = match self.seed {
            Some(seed) => GameSession::with_seed(seed),
            None => GameSession::new(),
        };
        for name in &self.players {
            session.add_player(name)?;
        }
        session.enable_rules(&self.rules)?;
        Ok(session)
    }
}
