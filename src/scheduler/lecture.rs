//! Priority-driven greedy lecture scheduler with bump-and-retry.
//!
//! # Algorithm
//!
//! 1. Order courses by `(fewer mapped lecturers, higher max class
//!    enrollment)`: hard-to-staff, high-demand courses are placed first.
//! 2. Decompose credit hours into contiguous-slot blocks (2s then an
//!    optional 1).
//! 3. Per course/class/block, try (day, start) candidates best time
//!    priority first with a random tiebreak, selecting a lecturer
//!    (availability coverage, then load) and a room (type/capacity
//!    policy, then usage).
//! 4. If a candidate conflicts, bump: release the bookings of one
//!    committed session with strictly lower enrollment; commit the
//!    candidate if it now fits and re-queue the displaced course, else
//!    revert the release exactly.
//! 5. Courses with unplaced blocks re-enter a retry queue; cycles are
//!    capped, and survivors stay in the issues log.
//!
//! The schedule is heuristic, not optimal, and not guaranteed complete:
//! the caller inspects [`LectureOutcome::issues`] and decides.

use rand::Rng;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use crate::ledger::BookingLedger;
use crate::models::{Course, LectureOutcome, Lecturer, Room, RoomType, SchedulingIssue, Session};
use crate::slots::{self, CombinationCache};

use super::EnrollmentBreakdown;

/// Input container for lecture scheduling.
#[derive(Debug, Clone, Default)]
pub struct LectureProblem {
    /// Courses to place.
    pub courses: Vec<Course>,
    /// Course → classes taking it.
    pub course_classes: HashMap<String, Vec<String>>,
    /// Course → class → enrolled student ids.
    pub enrollment: EnrollmentBreakdown,
    /// Room roster.
    pub rooms: Vec<Room>,
    /// Course → lecturers who can teach it.
    pub course_lecturers: HashMap<String, Vec<String>>,
    /// Lecturer roster with availability.
    pub lecturers: Vec<Lecturer>,
    /// Weekday list (fixed weekly cycle).
    pub days: Vec<String>,
    /// Ordered lecture slot labels; adjacency by start hour.
    pub time_slots: Vec<String>,
}

impl LectureProblem {
    /// Creates a problem over the given rooms, days, and slots.
    pub fn new(rooms: Vec<Room>, days: Vec<String>, time_slots: Vec<String>) -> Self {
        Self {
            rooms,
            days,
            time_slots,
            ..Self::default()
        }
    }

    /// Adds a course.
    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    /// Adds a lecturer to the roster.
    pub fn with_lecturer(mut self, lecturer: Lecturer) -> Self {
        self.lecturers.push(lecturer);
        self
    }

    /// Maps lecturers to a course.
    pub fn with_course_lecturers(
        mut self,
        course: impl Into<String>,
        lecturers: Vec<String>,
    ) -> Self {
        self.course_lecturers.insert(course.into(), lecturers);
        self
    }

    /// Registers a class for a course with its enrolled student ids.
    pub fn with_class_enrollment(
        mut self,
        course: impl Into<String>,
        class_code: impl Into<String>,
        student_ids: Vec<String>,
    ) -> Self {
        let course = course.into();
        let class_code = class_code.into();
        self.course_classes
            .entry(course.clone())
            .or_default()
            .push(class_code.clone());
        self.enrollment
            .entry(course)
            .or_default()
            .insert(class_code, student_ids);
        self
    }

    /// Enrollment of one class for one course.
    pub fn class_enrollment(&self, course: &str, class_code: &str) -> u32 {
        self.enrollment
            .get(course)
            .and_then(|classes| classes.get(class_code))
            .map_or(0, |ids| ids.len() as u32)
    }

    /// Highest per-class enrollment for a course (0 if none).
    pub fn max_enrollment(&self, course: &str) -> u32 {
        self.course_classes
            .get(course)
            .map(|classes| {
                classes
                    .iter()
                    .map(|c| self.class_enrollment(course, c))
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }

    fn lecturer_count(&self, course: &str) -> usize {
        self.course_lecturers.get(course).map_or(0, Vec::len)
    }
}

/// Queue key: fewer lecturers first, then higher enrollment, then code
/// for a stable deterministic tie.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QueueEntry {
    lecturer_count: usize,
    max_enrollment: u32,
    code: String,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lecturer_count
            .cmp(&other.lecturer_count)
            .then_with(|| other.max_enrollment.cmp(&self.max_enrollment))
            .then_with(|| self.code.cmp(&other.code))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority-driven greedy lecture scheduler.
///
/// # Example
///
/// ```
/// use campus_schedule::models::{Course, Lecturer, Room};
/// use campus_schedule::scheduler::{LectureProblem, LectureScheduler};
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
///
/// let problem = LectureProblem::new(
///     vec![Room::classroom("CR-1", 60)],
///     vec!["Monday".into()],
///     vec!["08:00 - 08:55".into(), "09:00 - 09:55".into()],
/// )
/// .with_course(Course::new("CSC101", 2))
/// .with_lecturer(Lecturer::new("dr.ade"))
/// .with_course_lecturers("CSC101", vec!["dr.ade".into()])
/// .with_class_enrollment("CSC101", "CS-1", (0..40).map(|i| format!("s{i}")).collect());
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let outcome = LectureScheduler::new().schedule(&problem, &mut rng);
/// assert_eq!(outcome.session_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct LectureScheduler {
    /// Retry cycles after the primary queue drains.
    pub max_retry_cycles: u32,
    /// Enrollment at which a class only fits lecture halls.
    pub large_class_threshold: u32,
}

impl LectureScheduler {
    /// Creates a scheduler with default tuning (3 retry cycles,
    /// large-class threshold 200).
    pub fn new() -> Self {
        Self {
            max_retry_cycles: 3,
            large_class_threshold: 200,
        }
    }

    /// Sets the retry cycle cap.
    pub fn with_max_retry_cycles(mut self, cycles: u32) -> Self {
        self.max_retry_cycles = cycles;
        self
    }

    /// Sets the large-class enrollment threshold.
    pub fn with_large_class_threshold(mut self, threshold: u32) -> Self {
        self.large_class_threshold = threshold;
        self
    }

    /// Schedules all courses, returning the sessions placed and the
    /// issues for every block that could not be placed.
    pub fn schedule<R: Rng>(&self, problem: &LectureProblem, rng: &mut R) -> LectureOutcome {
        let mut run = Run::new(self, problem, rng);
        run.execute();
        LectureOutcome {
            sessions: run.sessions,
            issues: run.issues,
        }
    }
}

impl Default for LectureScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable state for one scheduling run. Never shared across runs.
struct Run<'a, R: Rng> {
    cfg: &'a LectureScheduler,
    problem: &'a LectureProblem,
    rng: &'a mut R,
    courses_by_code: HashMap<&'a str, &'a Course>,
    lecturers_by_id: HashMap<&'a str, &'a Lecturer>,
    room_ledger: BookingLedger,
    lecturer_ledger: BookingLedger,
    class_ledger: BookingLedger,
    room_usage: HashMap<String, u32>,
    lecturer_load: HashMap<String, u32>,
    combinations: CombinationCache,
    sessions: Vec<Session>,
    issues: HashMap<String, Vec<SchedulingIssue>>,
}

impl<'a, R: Rng> Run<'a, R> {
    fn new(cfg: &'a LectureScheduler, problem: &'a LectureProblem, rng: &'a mut R) -> Self {
        Self {
            cfg,
            problem,
            rng,
            courses_by_code: problem
                .courses
                .iter()
                .map(|c| (c.code.as_str(), c))
                .collect(),
            lecturers_by_id: problem
                .lecturers
                .iter()
                .map(|l| (l.id.as_str(), l))
                .collect(),
            room_ledger: BookingLedger::new(),
            lecturer_ledger: BookingLedger::new(),
            class_ledger: BookingLedger::new(),
            room_usage: HashMap::new(),
            lecturer_load: HashMap::new(),
            combinations: CombinationCache::new(),
            sessions: Vec::new(),
            issues: HashMap::new(),
        }
    }

    fn queue_entry(&self, code: &str) -> QueueEntry {
        QueueEntry {
            lecturer_count: self.problem.lecturer_count(code),
            max_enrollment: self.problem.max_enrollment(code),
            code: code.to_string(),
        }
    }

    fn execute(&mut self) {
        let mut queue: BinaryHeap<Reverse<QueueEntry>> = self
            .problem
            .courses
            .iter()
            .filter(|c| c.credit_hours >= 1)
            .map(|c| Reverse(self.queue_entry(&c.code)))
            .collect();
        let mut retry: Vec<QueueEntry> = Vec::new();
        let mut cycle = 0;

        loop {
            if queue.is_empty() {
                if retry.is_empty() {
                    break;
                }
                cycle += 1;
                if cycle > self.cfg.max_retry_cycles {
                    break;
                }
                queue.extend(retry.drain(..).map(Reverse));
            }
            let Some(Reverse(entry)) = queue.pop() else {
                break;
            };
            self.schedule_course(&entry.code, &mut retry);
        }

        // Courses still queued when the cycle cap hits (typically bump
        // victims) must not vanish without a trace.
        let mut leftover: Vec<String> = retry.drain(..).map(|e| e.code).collect();
        leftover.sort();
        leftover.dedup();
        for code in leftover {
            self.log_unplaced_blocks(&code);
        }
    }

    /// Logs an issue for every block of a course that is still missing
    /// from the committed sessions.
    fn log_unplaced_blocks(&mut self, code: &str) {
        let Some(course) = self.courses_by_code.get(code).copied() else {
            return;
        };
        let blocks = slots::credit_blocks(course.credit_hours);
        let classes = self
            .problem
            .course_classes
            .get(code)
            .cloned()
            .unwrap_or_default();
        for class_code in &classes {
            if self.problem.class_enrollment(code, class_code) == 0 {
                continue;
            }
            for block in self.remaining_blocks(code, class_code, &blocks) {
                self.issues
                    .entry(code.to_string())
                    .or_default()
                    .push(SchedulingIssue {
                        class_code: class_code.clone(),
                        block,
                        reason: "displaced and not rescheduled within the retry budget".into(),
                    });
            }
        }
    }

    /// Places every outstanding block of a course. A course with any
    /// failed block is pushed onto `retry` once.
    fn schedule_course(&mut self, code: &str, retry: &mut Vec<QueueEntry>) {
        let Some(course) = self.courses_by_code.get(code).copied() else {
            return;
        };
        let blocks = slots::credit_blocks(course.credit_hours);
        let classes = self
            .problem
            .course_classes
            .get(code)
            .cloned()
            .unwrap_or_default();
        let mut any_failed = false;

        for class_code in &classes {
            let enrollment = self.problem.class_enrollment(code, class_code);
            if enrollment == 0 {
                continue;
            }
            // Blocks already committed in an earlier pass (or pass of a
            // bumped course) are not placed twice.
            for block in self.remaining_blocks(code, class_code, &blocks) {
                if self.place_block(course, class_code, enrollment, block, retry) {
                    continue;
                }
                any_failed = true;
                self.issues
                    .entry(code.to_string())
                    .or_default()
                    .push(SchedulingIssue {
                        class_code: class_code.clone(),
                        block,
                        reason: "no feasible day/slot/room combination (will retry)".into(),
                    });
            }
        }

        if any_failed {
            retry.push(self.queue_entry(code));
        }
    }

    /// Multiset difference between the required block sizes and the
    /// sessions already committed for (course, class).
    fn remaining_blocks(&self, code: &str, class_code: &str, blocks: &[usize]) -> Vec<usize> {
        let mut have: Vec<usize> = self
            .sessions
            .iter()
            .filter(|s| s.course == code && s.class_code == class_code)
            .map(|s| s.slots.len())
            .collect();
        let mut remaining = Vec::new();
        for &block in blocks {
            if let Some(pos) = have.iter().position(|&h| h == block) {
                have.swap_remove(pos);
            } else {
                remaining.push(block);
            }
        }
        remaining
    }

    fn place_block(
        &mut self,
        course: &Course,
        class_code: &str,
        enrollment: u32,
        block: usize,
        retry: &mut Vec<QueueEntry>,
    ) -> bool {
        let candidates = self
            .combinations
            .get(self.problem.days.len(), &self.problem.time_slots, block)
            .to_vec();
        // Best time priority first; random tiebreak avoids starving the
        // same late candidates every run.
        let mut keyed: Vec<(i32, f64, (usize, usize))> = candidates
            .into_iter()
            .map(|c| {
                let priority = slots::time_priority(&self.problem.time_slots[c.1]);
                (-(priority as i32), self.rng.random::<f64>(), c)
            })
            .collect();
        keyed.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then(a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
        });

        let has_lecturers = self.problem.lecturer_count(&course.code) > 0;
        for (_, _, (day_idx, start)) in keyed {
            let day = self.problem.days[day_idx].clone();
            let slot_block = self.problem.time_slots[start..start + block].to_vec();

            let lecturer = if has_lecturers {
                match self.select_lecturer(&course.code, &day, &slot_block) {
                    Some(l) => Some(l),
                    None => continue,
                }
            } else {
                None
            };

            let Some(room) = self.select_room(enrollment, course, &day, &slot_block) else {
                continue;
            };

            let candidate = Session {
                course: course.code.clone(),
                class_code: class_code.to_string(),
                day,
                slots: slot_block,
                room,
                lecturer,
                enrollment,
            };
            if self.try_assign(candidate, retry) {
                return true;
            }
        }
        false
    }

    /// Picks a lecturer mapped to the course: availability-covering ones
    /// first, then least loaded, preserving mapping order on ties.
    /// Prefers lecturers free in the booking ledger; when every covering
    /// lecturer is booked, returns the best covering one so the commit
    /// attempt can try to bump the conflicting session. Declared
    /// availability is never overridden.
    fn select_lecturer(&mut self, code: &str, day: &str, slot_block: &[String]) -> Option<String> {
        let ids = self.problem.course_lecturers.get(code)?;
        let covers = |id: &str| {
            self.lecturers_by_id
                .get(id)
                .map_or(true, |l| l.covers(day, slot_block))
        };
        let mut ordered: Vec<&String> = ids.iter().filter(|id| covers(id)).collect();
        ordered.sort_by_key(|id| self.lecturer_load.get(id.as_str()).copied().unwrap_or(0));
        ordered
            .iter()
            .find(|id| self.lecturer_ledger.is_available(id.as_str(), day, slot_block))
            .or(ordered.first())
            .map(|id| (*id).clone())
    }

    /// Room selection policy.
    ///
    /// Practicals: laboratory matching the course's lab subtype, capacity
    /// first-fit ascending. Others: lecture hall/classroom/auditorium with
    /// capacity ≥ enrollment; large classes are restricted to lecture
    /// halls (biggest, least used first); small classes are capped at
    /// max(2×enrollment, 100) seats (tightest, least used first). Large
    /// classes that find nothing fall back to any big enough lecture hall
    /// or auditorium.
    ///
    /// Prefers a ledger-free room; when every eligible room is booked,
    /// returns the best eligible one so the commit attempt can bump.
    fn select_room(
        &mut self,
        enrollment: u32,
        course: &Course,
        day: &str,
        slot_block: &[String],
    ) -> Option<String> {
        let large = enrollment >= self.cfg.large_class_threshold;
        let usage = |r: &Room| self.room_usage.get(&r.code).copied().unwrap_or(0);

        let mut suitable: Vec<&Room> = if course.is_lab_practical() {
            let subtype = course.lab_subtype.as_deref();
            self.problem
                .rooms
                .iter()
                .filter(|r| {
                    r.room_type == RoomType::Laboratory
                        && subtype.is_some_and(|s| r.supports_lab_subtype(s))
                        && r.capacity >= enrollment
                })
                .collect()
        } else {
            self.problem
                .rooms
                .iter()
                .filter(|r| {
                    r.hosts_lectures()
                        && r.capacity >= enrollment
                        && (!large || r.room_type == RoomType::LectureHall)
                        && (large || r.capacity <= (enrollment * 2).max(100))
                })
                .collect()
        };

        if large {
            suitable.sort_by_key(|r| (Reverse(r.capacity), usage(r), r.code.clone()));
        } else {
            suitable.sort_by_key(|r| (r.capacity, usage(r), r.code.clone()));
        }

        if large && !course.is_lab_practical() {
            // Lecture halls full or absent: any big enough hall or
            // auditorium joins the candidate list after the strict stage.
            let mut fallback: Vec<&Room> = self
                .problem
                .rooms
                .iter()
                .filter(|r| {
                    r.capacity >= enrollment
                        && matches!(r.room_type, RoomType::LectureHall | RoomType::Auditorium)
                        && !suitable.iter().any(|s| s.code == r.code)
                })
                .collect();
            fallback.sort_by_key(|r| (Reverse(r.capacity), usage(r), r.code.clone()));
            suitable.extend(fallback);
        }

        suitable
            .iter()
            .find(|r| self.room_ledger.is_available(&r.code, day, slot_block))
            .or(suitable.first())
            .map(|r| r.code.clone())
    }

    fn fits(&self, s: &Session) -> bool {
        self.room_ledger.is_available(&s.room, &s.day, &s.slots)
            && self.class_ledger.is_available(&s.class_code, &s.day, &s.slots)
            && s.lecturer
                .as_deref()
                .is_none_or(|l| self.lecturer_ledger.is_available(l, &s.day, &s.slots))
    }

    fn commit(&mut self, s: Session) {
        self.room_ledger.assign(&s.room, &s.day, &s.slots);
        self.class_ledger.assign(&s.class_code, &s.day, &s.slots);
        if let Some(lecturer) = &s.lecturer {
            self.lecturer_ledger.assign(lecturer, &s.day, &s.slots);
            *self.lecturer_load.entry(lecturer.clone()).or_insert(0) += 1;
        }
        *self.room_usage.entry(s.room.clone()).or_insert(0) += 1;
        self.sessions.push(s);
    }

    fn release(&mut self, s: &Session) {
        self.room_ledger.unassign(&s.room, &s.day, &s.slots);
        self.class_ledger.unassign(&s.class_code, &s.day, &s.slots);
        if let Some(lecturer) = &s.lecturer {
            self.lecturer_ledger.unassign(lecturer, &s.day, &s.slots);
            if let Some(load) = self.lecturer_load.get_mut(lecturer) {
                *load = load.saturating_sub(1);
            }
        }
        if let Some(usage) = self.room_usage.get_mut(&s.room) {
            *usage = usage.saturating_sub(1);
        }
    }

    fn rebook(&mut self, s: &Session) {
        self.room_ledger.assign(&s.room, &s.day, &s.slots);
        self.class_ledger.assign(&s.class_code, &s.day, &s.slots);
        if let Some(lecturer) = &s.lecturer {
            self.lecturer_ledger.assign(lecturer, &s.day, &s.slots);
            *self.lecturer_load.entry(lecturer.clone()).or_insert(0) += 1;
        }
        *self.room_usage.entry(s.room.clone()).or_insert(0) += 1;
    }

    /// Direct commit, or bump one strictly lower-enrollment session out
    /// of the way. A failed bump reverts the victim's bookings exactly;
    /// a successful bump removes the victim session and re-queues its
    /// course.
    fn try_assign(&mut self, candidate: Session, retry: &mut Vec<QueueEntry>) -> bool {
        if self.fits(&candidate) {
            self.commit(candidate);
            return true;
        }

        // Snapshot of bump victims: lowest enrollment first, random
        // tiebreak, computed before any ledger mutation.
        let mut order: Vec<(u32, f64, usize)> = self
            .sessions
            .iter()
            .enumerate()
            .map(|(i, s)| (s.enrollment, self.rng.random::<f64>(), i))
            .collect();
        order.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then(a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
        });

        for (enrollment, _, idx) in order {
            if enrollment >= candidate.enrollment {
                break; // sorted ascending: no strictly lower victims left
            }
            let victim = self.sessions[idx].clone();
            self.release(&victim);
            if self.fits(&candidate) {
                self.sessions.remove(idx);
                retry.push(self.queue_entry(&victim.course));
                self.commit(candidate);
                return true;
            }
            self.rebook(&victim);
        }
        false
    }
}
