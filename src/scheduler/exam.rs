//! Column-packing exam scheduler with overflow rooms and proctors.
//!
//! # Algorithm
//!
//! Courses are processed largest enrollment first so big cohorts are not
//! starved of space. Lab/practical courses skip automation entirely and
//! go to the manual log. For everything else, (day, slot) candidates are
//! tried in randomized order; ordinary rooms in descending capacity
//! order. A room's columns are partitioned evenly among the courses that
//! may share it (`columns / max_courses`), and a course only claims a
//! partition when its remaining students would fill all but the last
//! column and at least 75% of that one. Each claim seats students of one
//! class, in enrollment order; further classes are picked up by later
//! (day, slot) iterations or by overflow rooms, which consume a plain
//! remaining-capacity counter with no utilization gating and defer
//! column layout to humans.
//!
//! Proctors are assigned per room in two tiers: those with explicit date
//! availability first (when free that day), then those without; a
//! proctor covers at most one room per (day, slot).

use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::models::{
    ColumnAssignment, CourseType, ExamAssignment, ExamOutcome, Lecturer, ManualAssignment, Room,
    RoomAllocation, RoomType, UnusedColumn,
};

use super::EnrollmentBreakdown;

/// Input container for exam scheduling.
#[derive(Debug, Clone, Default)]
pub struct ExamProblem {
    /// Course → total enrollment.
    pub enrollments: HashMap<String, u32>,
    /// Course → type; lab/practical courses are scheduled manually.
    pub course_types: HashMap<String, CourseType>,
    /// Exam dates, in calendar order.
    pub exam_days: Vec<String>,
    /// Exam slot labels per day.
    pub exam_slots: Vec<String>,
    /// Room roster; overflow rooms are flagged, ordinary exam rooms need
    /// dimensions and a course-sharing limit.
    pub rooms: Vec<Room>,
    /// Proctor pool; `proctor_dates` distinguishes the two assignment tiers.
    pub proctors: Vec<Lecturer>,
    /// Course → class → student ids in seat fill order.
    pub breakdown: EnrollmentBreakdown,
}

impl ExamProblem {
    /// Creates a problem over the given rooms, days, and slots.
    pub fn new(rooms: Vec<Room>, exam_days: Vec<String>, exam_slots: Vec<String>) -> Self {
        Self {
            rooms,
            exam_days,
            exam_slots,
            ..Self::default()
        }
    }

    /// Registers a course with its type and per-class student ids.
    ///
    /// Total enrollment is the sum of the class lists.
    pub fn with_course(
        mut self,
        course: impl Into<String>,
        course_type: CourseType,
        classes: Vec<(String, Vec<String>)>,
    ) -> Self {
        let course = course.into();
        let total: u32 = classes.iter().map(|(_, ids)| ids.len() as u32).sum();
        self.enrollments.insert(course.clone(), total);
        self.course_types.insert(course.clone(), course_type);
        let entry = self.breakdown.entry(course).or_default();
        for (class_code, ids) in classes {
            entry.insert(class_code, ids);
        }
        self
    }

    /// Adds a proctor.
    pub fn with_proctor(mut self, proctor: Lecturer) -> Self {
        self.proctors.push(proctor);
        self
    }
}

/// Column-packing exam scheduler.
#[derive(Debug, Clone)]
pub struct ExamScheduler {
    /// Minimum fill ratio for the last column of a claimed partition.
    pub min_column_fill: f64,
}

impl ExamScheduler {
    /// Creates a scheduler with the default 75% last-column fill gate.
    pub fn new() -> Self {
        Self {
            min_column_fill: 0.75,
        }
    }

    /// Sets the last-column fill gate.
    pub fn with_min_column_fill(mut self, ratio: f64) -> Self {
        self.min_column_fill = ratio;
        self
    }

    /// Schedules every course's exam, returning the assignments plus the
    /// manual-intervention and unused-column logs.
    pub fn schedule<R: Rng>(&self, problem: &ExamProblem, rng: &mut R) -> ExamOutcome {
        let mut run = ExamRun::new(self, problem);
        run.execute(rng);
        let unused_columns = run.unused_columns();
        ExamOutcome {
            exams: run.exams,
            manual_log: run.manual_log,
            unused_columns,
        }
    }
}

impl Default for ExamScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Key into per-(day, slot) state.
type SlotKey = (usize, usize);

/// Mutable state for one exam run. Never shared across runs.
struct ExamRun<'a> {
    cfg: &'a ExamScheduler,
    problem: &'a ExamProblem,
    /// Ordinary rooms, biggest first.
    ordinary_rooms: Vec<&'a Room>,
    /// Overflow rooms, roster order.
    overflow_rooms: Vec<&'a Room>,
    /// (day, slot) → room → claimed column indices.
    columns_used: HashMap<SlotKey, HashMap<String, BTreeSet<u32>>>,
    /// (day, slot) → room → courses seated there.
    room_courses: HashMap<SlotKey, HashMap<String, HashSet<String>>>,
    /// (day, slot) → room → assigned proctors.
    proctor_used: HashMap<SlotKey, HashMap<String, BTreeSet<String>>>,
    /// (day, slot) → proctors already covering some room.
    proctor_busy: HashMap<SlotKey, HashSet<String>>,
    /// (day, slot) → overflow room → remaining seats (lazily seeded).
    overflow_space: HashMap<SlotKey, HashMap<String, u32>>,
    /// (course, class) → students already seated.
    seated: HashMap<(String, String), usize>,
    /// Partition-remainder columns left unclaimed, deduplicated.
    extra_columns: BTreeSet<(usize, usize, String, u32, u32)>,
    exams: Vec<ExamAssignment>,
    manual_log: Vec<ManualAssignment>,
}

impl<'a> ExamRun<'a> {
    fn new(cfg: &'a ExamScheduler, problem: &'a ExamProblem) -> Self {
        let mut ordinary_rooms: Vec<&Room> = problem
            .rooms
            .iter()
            .filter(|r| !r.overflow && r.room_type != RoomType::Laboratory)
            .collect();
        ordinary_rooms.sort_by_key(|r| (Reverse(r.capacity), r.code.clone()));
        let overflow_rooms: Vec<&Room> = problem.rooms.iter().filter(|r| r.overflow).collect();

        Self {
            cfg,
            problem,
            ordinary_rooms,
            overflow_rooms,
            columns_used: HashMap::new(),
            room_courses: HashMap::new(),
            proctor_used: HashMap::new(),
            proctor_busy: HashMap::new(),
            overflow_space: HashMap::new(),
            seated: HashMap::new(),
            extra_columns: BTreeSet::new(),
            exams: Vec::new(),
            manual_log: Vec::new(),
        }
    }

    fn execute<R: Rng>(&mut self, rng: &mut R) {
        // Largest courses first; code tiebreak keeps runs deterministic
        // for equal enrollments.
        let mut courses: Vec<(&String, u32)> = self
            .problem
            .enrollments
            .iter()
            .map(|(c, &n)| (c, n))
            .collect();
        courses.sort_by_key(|&(code, n)| (Reverse(n), code.clone()));

        for (course, course_size) in courses {
            if self
                .problem
                .course_types
                .get(course)
                .is_some_and(CourseType::is_lab_practical)
            {
                self.manual_log.push(ManualAssignment {
                    course: course.clone(),
                    unassigned_count: course_size,
                    reason: "lab practical to be scheduled manually".into(),
                });
                continue;
            }
            self.schedule_course(course, course_size, rng);
        }
    }

    fn schedule_course<R: Rng>(&mut self, course: &str, course_size: u32, rng: &mut R) {
        let mut unassigned = course_size;
        let mut rooms_used: Vec<RoomAllocation> = Vec::new();
        let mut proctors_by_room: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut assigned_at: Option<SlotKey> = None;

        // Randomized (day, slot) order avoids systematically loading the
        // first dates.
        let mut combos: Vec<SlotKey> = (0..self.problem.exam_days.len())
            .flat_map(|d| (0..self.problem.exam_slots.len()).map(move |s| (d, s)))
            .collect();
        combos.shuffle(rng);

        for key in combos {
            for room in self.ordinary_rooms.clone() {
                if unassigned == 0 {
                    break;
                }
                self.try_claim_ordinary(
                    course,
                    room,
                    key,
                    &mut unassigned,
                    &mut rooms_used,
                    &mut proctors_by_room,
                    &mut assigned_at,
                );
            }

            if unassigned > 0 {
                for room in self.overflow_rooms.clone() {
                    self.try_claim_overflow(
                        course,
                        room,
                        key,
                        &mut unassigned,
                        &mut rooms_used,
                        &mut proctors_by_room,
                        &mut assigned_at,
                    );
                    if unassigned == 0 {
                        break;
                    }
                }
            }

            if unassigned == 0 {
                break;
            }
        }

        // assigned_at is set on the first claim, so it is present
        // whenever any student was seated.
        if course_size > unassigned {
            if let Some((day_idx, slot_idx)) = assigned_at {
                self.exams.push(ExamAssignment {
                    course: course.to_string(),
                    day: self.problem.exam_days[day_idx].clone(),
                    slot: self.problem.exam_slots[slot_idx].clone(),
                    rooms: rooms_used,
                    proctors: proctors_by_room,
                });
            }
        }
        if unassigned > 0 {
            self.manual_log.push(ManualAssignment {
                course: course.to_string(),
                unassigned_count: unassigned,
                reason: "not enough space in all rooms including overflow".into(),
            });
        }
    }

    /// Attempts to claim a column partition of an ordinary room.
    #[allow(clippy::too_many_arguments)]
    fn try_claim_ordinary(
        &mut self,
        course: &str,
        room: &Room,
        key: SlotKey,
        unassigned: &mut u32,
        rooms_used: &mut Vec<RoomAllocation>,
        proctors_by_room: &mut BTreeMap<String, BTreeSet<String>>,
        assigned_at: &mut Option<SlotKey>,
    ) {
        let hosted = self
            .room_courses
            .get(&key)
            .and_then(|rooms| rooms.get(&room.code));
        if hosted.is_some_and(|courses| {
            courses.len() >= room.max_courses as usize || courses.contains(course)
        }) {
            return;
        }
        // One room serves a course once, even across different slots.
        if rooms_used.iter().any(|r| r.room == room.code) {
            return;
        }

        // Dimensions and max_courses are checked by validation.
        let Some(dims) = room.dimensions else {
            return;
        };
        if room.max_courses == 0 {
            return;
        }
        let used: BTreeSet<u32> = self
            .columns_used
            .get(&key)
            .and_then(|rooms| rooms.get(&room.code))
            .cloned()
            .unwrap_or_default();
        let free: Vec<u32> = (0..dims.columns).filter(|c| !used.contains(c)).collect();
        let max_cols = dims.columns / room.max_courses;
        if free.len() < max_cols as usize {
            return;
        }

        // All but the last column full, last column at least 75% used:
        // don't waste a multi-column partition on a small residue.
        let required =
            (max_cols.saturating_sub(1) * dims.rows) as f64 + self.cfg.min_column_fill * dims.rows as f64;
        if (*unassigned as f64) < required {
            return;
        }

        let Some((class_code, assigned_ids)) =
            self.take_students(course, *unassigned, max_cols * dims.rows)
        else {
            return;
        };
        *unassigned -= assigned_ids.len() as u32;

        let claimed: BTreeSet<u32> = free.iter().take(max_cols as usize).copied().collect();
        self.columns_used
            .entry(key)
            .or_default()
            .entry(room.code.clone())
            .or_default()
            .extend(claimed.iter().copied());
        self.room_courses
            .entry(key)
            .or_default()
            .entry(room.code.clone())
            .or_default()
            .insert(course.to_string());

        rooms_used.push(RoomAllocation {
            room: room.code.clone(),
            columns: ColumnAssignment::Columns(claimed),
            class_code,
            student_ids: assigned_ids,
        });

        let covering = self.assign_proctors(room, key);
        proctors_by_room
            .entry(room.code.clone())
            .or_default()
            .extend(covering);
        if assigned_at.is_none() {
            *assigned_at = Some(key);
        }

        // Columns beyond an even partition can never be claimed through
        // the partition rule; report them for manual reuse.
        let remainder = dims.columns % room.max_courses;
        let used_now = &self.columns_used[&key][&room.code];
        for column in (dims.columns - remainder)..dims.columns {
            if !used_now.contains(&column) {
                self.extra_columns
                    .insert((key.0, key.1, room.code.clone(), column, dims.rows));
            }
        }
    }

    /// Attempts to spill into an overflow room's running capacity.
    #[allow(clippy::too_many_arguments)]
    fn try_claim_overflow(
        &mut self,
        course: &str,
        room: &Room,
        key: SlotKey,
        unassigned: &mut u32,
        rooms_used: &mut Vec<RoomAllocation>,
        proctors_by_room: &mut BTreeMap<String, BTreeSet<String>>,
        assigned_at: &mut Option<SlotKey>,
    ) {
        let space = *self
            .overflow_space
            .entry(key)
            .or_default()
            .entry(room.code.clone())
            .or_insert(room.capacity);
        if space == 0 {
            return;
        }

        let Some((class_code, assigned_ids)) = self.take_students(course, *unassigned, space)
        else {
            return;
        };
        let taken = assigned_ids.len() as u32;
        *unassigned -= taken;
        if let Some(remaining) = self
            .overflow_space
            .get_mut(&key)
            .and_then(|rooms| rooms.get_mut(&room.code))
        {
            *remaining -= taken;
        }
        self.room_courses
            .entry(key)
            .or_default()
            .entry(room.code.clone())
            .or_default()
            .insert(course.to_string());

        rooms_used.push(RoomAllocation {
            room: room.code.clone(),
            columns: ColumnAssignment::Manual,
            class_code,
            student_ids: assigned_ids,
        });

        let covering = self.assign_proctors(room, key);
        proctors_by_room
            .entry(room.code.clone())
            .or_default()
            .extend(covering);
        if assigned_at.is_none() {
            *assigned_at = Some(key);
        }
    }

    /// Takes up to `min(unassigned, cap)` not-yet-seated students from
    /// the first class that still has any, advancing the seat tracker.
    fn take_students(
        &mut self,
        course: &str,
        unassigned: u32,
        cap: u32,
    ) -> Option<(String, Vec<String>)> {
        let classes = self.problem.breakdown.get(course)?;
        for (class_code, ids) in classes {
            let offset = self
                .seated
                .get(&(course.to_string(), class_code.clone()))
                .copied()
                .unwrap_or(0);
            let remaining = &ids[offset.min(ids.len())..];
            if remaining.is_empty() {
                continue;
            }
            let take = (unassigned.min(cap) as usize).min(remaining.len());
            if take == 0 {
                continue;
            }
            let assigned_ids = remaining[..take].to_vec();
            *self
                .seated
                .entry((course.to_string(), class_code.clone()))
                .or_insert(0) += take;
            return Some((class_code.clone(), assigned_ids));
        }
        None
    }

    /// Tops a room's proctor coverage up to its requirement: proctors
    /// with explicit date availability first, then the always-available
    /// pool. A proctor covers at most one room per (day, slot).
    fn assign_proctors(&mut self, room: &Room, key: SlotKey) -> BTreeSet<String> {
        let day = &self.problem.exam_days[key.0];
        let have = self
            .proctor_used
            .get(&key)
            .and_then(|rooms| rooms.get(&room.code))
            .map_or(0, BTreeSet::len);
        let mut needed = (room.proctors_required as usize).saturating_sub(have);

        let dated_first = self
            .problem
            .proctors
            .iter()
            .filter(|p| p.proctor_dates.is_some())
            .chain(
                self.problem
                    .proctors
                    .iter()
                    .filter(|p| p.proctor_dates.is_none()),
            );
        for proctor in dated_first {
            if needed == 0 {
                break;
            }
            let busy = self.proctor_busy.entry(key).or_default();
            if busy.contains(&proctor.id) || !proctor.can_proctor_on(day) {
                continue;
            }
            busy.insert(proctor.id.clone());
            self.proctor_used
                .entry(key)
                .or_default()
                .entry(room.code.clone())
                .or_default()
                .insert(proctor.id.clone());
            needed -= 1;
        }

        self.proctor_used
            .get(&key)
            .and_then(|rooms| rooms.get(&room.code))
            .cloned()
            .unwrap_or_default()
    }

    /// Final unused-column log: suppress rooms already at their course
    /// limit unless they are overflow rooms.
    fn unused_columns(&self) -> Vec<UnusedColumn> {
        self.extra_columns
            .iter()
            .filter(|(d, s, room_code, _, _)| {
                let room = self.problem.rooms.iter().find(|r| r.code == *room_code);
                let at_limit = self
                    .room_courses
                    .get(&(*d, *s))
                    .and_then(|rooms| rooms.get(room_code))
                    .is_some_and(|courses| {
                        courses.len() >= room.map_or(0, |r| r.max_courses) as usize
                    });
                room.is_some_and(|r| r.overflow) || !at_limit
            })
            .map(|(d, s, room, column, rows)| UnusedColumn {
                day: self.problem.exam_days[*d].clone(),
                slot: self.problem.exam_slots[*s].clone(),
                room: room.clone(),
                column: *column,
                rows: *rows,
            })
            .collect()
    }
}
