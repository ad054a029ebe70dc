use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use chrono::{DateTime, Duration, TimeZone, Utc};
use vm_common::{
    Event, EventFormat, EventType, LocalStatus, ParticipationRecord, Volunteer,
    api::CandidateRequest,
    cache::{CacheEntry, CacheError, CandidateCache},
    matching::{
        keywords::KeywordSource,
        pipeline::{MatchingEngine, MatchingEngineConfig, MatchingError},
        prefilter::GovernanceReason,
    },
    store::{
        EventStore, InMemoryEventStore, InMemoryVolunteerStore, StoreError, VolunteerFilter,
        VolunteerStore,
    },
};

const CAREER_FAIR: i64 = 1;
const PAINT_NIGHT: i64 = 2;
const UNTITLED: i64 = 3;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap()
}

fn events() -> Vec<Event> {
    vec![
        Event {
            id: CAREER_FAIR,
            event_type: EventType::CareerFair,
            title: "Fall Career Fair".into(),
            format: Some(EventFormat::InPerson),
            ..Event::default()
        },
        Event {
            id: PAINT_NIGHT,
            event_type: EventType::VirtualSession,
            title: "Paint Outside the Lines".into(),
            format: Some(EventFormat::Virtual),
            ..Event::default()
        },
        Event {
            id: UNTITLED,
            event_type: EventType::Other,
            title: "A".into(),
            ..Event::default()
        },
    ]
}

fn volunteer(id: i64, title: &str) -> Volunteer {
    Volunteer {
        id,
        title: Some(title.into()),
        ..Volunteer::default()
    }
}

fn population() -> Vec<Volunteer> {
    let mut counselor = volunteer(10, "Career Counselor");
    counselor.participation_history = vec![ParticipationRecord {
        event_type: EventType::CareerFair,
        date: now() - Duration::days(400),
    }];

    let mut recruiter = volunteer(11, "Recruiting Lead");
    recruiter.skills = vec!["Resume review".into()];

    let mut painter = volunteer(12, "Graphic Designer");
    painter.skills = vec!["Painting".into()];

    let mut opted_out = volunteer(13, "Career Coach");
    opted_out.email_opt_out = true;

    let mut inactive = volunteer(14, "Career Coach");
    inactive.is_active = false;

    vec![
        counselor,
        recruiter,
        painter,
        opted_out,
        inactive,
        volunteer(15, "Pastry Chef"),
    ]
}

#[derive(Default)]
struct CallCounts {
    events: AtomicUsize,
    volunteers: AtomicUsize,
}

struct CountingEvents {
    inner: InMemoryEventStore,
    counts: Arc<CallCounts>,
}

impl EventStore for CountingEvents {
    fn get_event(&self, event_id: i64) -> Result<Option<Event>, StoreError> {
        self.counts.events.fetch_add(1, Ordering::SeqCst);
        self.inner.get_event(event_id)
    }
}

struct CountingVolunteers {
    inner: InMemoryVolunteerStore,
    counts: Arc<CallCounts>,
}

impl VolunteerStore for CountingVolunteers {
    fn list_volunteers(&self, filter: &VolunteerFilter) -> Result<Vec<Volunteer>, StoreError> {
        self.counts.volunteers.fetch_add(1, Ordering::SeqCst);
        self.inner.list_volunteers(filter)
    }
}

struct BrokenVolunteers;

impl VolunteerStore for BrokenVolunteers {
    fn list_volunteers(&self, _filter: &VolunteerFilter) -> Result<Vec<Volunteer>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

struct BrokenCache;

impl CandidateCache for BrokenCache {
    fn get(&self, _event_id: i64) -> Result<Option<Arc<CacheEntry>>, CacheError> {
        Err(CacheError::Unavailable("cache down".into()))
    }

    fn put(&self, _entry: CacheEntry) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("cache down".into()))
    }

    fn invalidate(&self, _event_id: i64) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("cache down".into()))
    }
}

fn counting_engine(volunteers: Vec<Volunteer>) -> (MatchingEngine, Arc<CallCounts>) {
    let counts = Arc::new(CallCounts::default());
    let engine = MatchingEngine::new(
        MatchingEngineConfig::default(),
        Arc::new(CountingEvents {
            inner: InMemoryEventStore::new(events()),
            counts: counts.clone(),
        }),
        Arc::new(CountingVolunteers {
            inner: InMemoryVolunteerStore::new(volunteers),
            counts: counts.clone(),
        }),
    );
    (engine, counts)
}

fn engine(volunteers: Vec<Volunteer>) -> MatchingEngine {
    counting_engine(volunteers).0
}

fn ids(candidates: &[vm_common::matching::scoring::Candidate]) -> Vec<i64> {
    candidates.iter().map(|c| c.volunteer_id).collect()
}

#[test]
fn career_fair_ranks_counselor_first() {
    let results = engine(population())
        .compute_candidates_at(&CandidateRequest::new(CAREER_FAIR), now())
        .unwrap();

    let type_keywords: Vec<_> = results
        .keyword_set
        .by_source(KeywordSource::EventType)
        .collect();
    assert!(type_keywords.starts_with(&["career", "job search", "networking"]));

    let top = &results.candidates[0];
    assert_eq!(top.volunteer_id, 10);
    assert!((top.total_score - 1.6).abs() < 1e-9);
    // Recruiting title 0.6 + resume skill 0.8.
    assert_eq!(ids(&results.candidates), vec![10, 11]);
    assert!((results.candidates[1].total_score - 1.4).abs() < 1e-9);
}

#[test]
fn paint_session_derives_arts_keywords_without_fallback() {
    let results = engine(population())
        .compute_candidates_at(&CandidateRequest::new(PAINT_NIGHT), now())
        .unwrap();

    let set = &results.keyword_set;
    assert_eq!(set.by_source(KeywordSource::EventType).count(), 0);
    assert_eq!(set.by_source(KeywordSource::Format).count(), 0);
    assert!(set.contains("paint"));
    assert!(set.contains("arts"));
    assert!(!set.used_fallback());
    assert_eq!(ids(&results.candidates), vec![12]);
}

#[test]
fn min_score_then_limit_shape_the_list() {
    let mut volunteers = Vec::new();
    for (id, connector, local, skills) in [
        (1, true, LocalStatus::Local, true),
        (2, true, LocalStatus::Unknown, true),
        (3, false, LocalStatus::Unknown, true),
        (4, true, LocalStatus::Partial, false),
        (5, false, LocalStatus::Unknown, false),
    ] {
        let mut v = volunteer(id, "Career Mentor");
        v.has_connector_profile = connector;
        v.local_status = local;
        if skills {
            v.skills = vec!["Interview practice".into()];
        }
        volunteers.push(v);
    }
    let engine = engine(volunteers);

    let all = engine
        .compute_candidates_at(&CandidateRequest::new(CAREER_FAIR), now())
        .unwrap();
    let totals: Vec<f64> = all.candidates.iter().map(|c| c.total_score).collect();
    // 0.6 + 0.8 + 0.4 + 0.2, 0.6 + 0.8 + 0.4, 0.6 + 0.8, 0.6 + 0.4 + 0.1, 0.6
    let expected = [2.0, 1.8, 1.4, 1.1, 0.6];
    for (got, want) in totals.iter().zip(expected) {
        assert!((got - want).abs() < 1e-9, "{got} != {want}");
    }

    let shaped = engine
        .compute_candidates_at(
            &CandidateRequest::new(CAREER_FAIR)
                .with_min_score(1.4)
                .with_limit(2),
            now(),
        )
        .unwrap();
    assert!(shaped.from_cache);
    assert_eq!(ids(&shaped.candidates), vec![1, 2]);

    let filtered = engine
        .compute_candidates_at(&CandidateRequest::new(CAREER_FAIR).with_min_score(1.4), now())
        .unwrap();
    assert_eq!(ids(&filtered.candidates), vec![1, 2, 3]);
}

#[test]
fn governance_flags_exclude_regardless_of_match_strength() {
    let results = engine(population())
        .compute_candidates_at(&CandidateRequest::new(CAREER_FAIR), now())
        .unwrap();

    assert!(!ids(&results.candidates).contains(&13));
    assert!(!ids(&results.candidates).contains(&14));
    let report = &results.prefilter_report;
    assert_eq!(report.was_governance_excluded(13), Some(GovernanceReason::EmailOptOut));
    assert_eq!(report.was_governance_excluded(14), Some(GovernanceReason::Inactive));
    assert_eq!(report.total_volunteers, 6);
}

#[test]
fn identical_inputs_give_identical_candidates() {
    let request = CandidateRequest::new(CAREER_FAIR);
    let first = engine(population())
        .compute_candidates_at(&request, now())
        .unwrap();
    let second = engine(population())
        .compute_candidates_at(&request, now())
        .unwrap();

    assert_eq!(first.candidates, second.candidates);
    assert_eq!(first.keyword_set, second.keyword_set);
    assert_eq!(first.prefilter_report, second.prefilter_report);
}

#[test]
fn adding_a_matching_skill_never_lowers_the_score() {
    let base = volunteer(1, "Career Counselor");
    let mut skilled = base.clone();
    skilled.skills = vec!["Networking events".into()];

    let score = |v: Volunteer| {
        engine(vec![v])
            .compute_candidates_at(&CandidateRequest::new(CAREER_FAIR), now())
            .unwrap()
            .candidates[0]
            .total_score
    };
    let before = score(base);
    let after = score(skilled);
    assert!(after >= before);
    assert!((after - before - 0.8).abs() < 1e-9);
}

#[test]
fn untitled_other_event_falls_back_to_universal_keywords() {
    let results = engine(population())
        .compute_candidates_at(&CandidateRequest::new(UNTITLED), now())
        .unwrap();

    assert!(results.keyword_set.is_universal_only());
    assert!(!results.prefilter_report.keyword_filter_applied);
    // Every contactable volunteer is scored when there is no keyword signal.
    assert_eq!(results.scored_total, 4);
    assert_eq!(results.candidates[0].volunteer_id, 10);
}

#[test]
fn equal_scores_order_by_volunteer_id() {
    let volunteers = vec![
        volunteer(30, "Career Coach"),
        volunteer(10, "Career Coach"),
        volunteer(20, "Career Coach"),
    ];
    let results = engine(volunteers)
        .compute_candidates_at(&CandidateRequest::new(CAREER_FAIR), now())
        .unwrap();
    assert_eq!(ids(&results.candidates), vec![10, 20, 30]);
}

#[test]
fn different_breakdowns_with_equal_sums_tie_by_id() {
    // title 0.6 + frequency 0.3
    let mut coach = volunteer(1, "Career Coach");
    coach.activity_count = 10;
    // skill 0.8 + frequency 0.1
    let reviewer = Volunteer {
        id: 2,
        skills: vec!["Resume review".into()],
        activity_count: 2,
        ..Volunteer::default()
    };

    let results = engine(vec![reviewer, coach])
        .compute_candidates_at(&CandidateRequest::new(CAREER_FAIR), now())
        .unwrap();
    assert_eq!(ids(&results.candidates), vec![1, 2]);
    assert_eq!(results.candidates[0].total_score, results.candidates[1].total_score);

    let rows = results.export_rows();
    assert_eq!(
        rows.iter()
            .map(|r| (r.rank, r.volunteer_id, format!("{:.2}", r.total_score)))
            .collect::<Vec<_>>(),
        vec![(1, 1, "0.90".to_string()), (2, 2, "0.90".to_string())]
    );
}

#[test]
fn repeat_request_fetches_from_stores_once() {
    let (engine, counts) = counting_engine(population());
    let request = CandidateRequest::new(CAREER_FAIR);

    let first = engine.compute_candidates_at(&request, now()).unwrap();
    let second = engine.compute_candidates_at(&request, now()).unwrap();

    assert_eq!(counts.events.load(Ordering::SeqCst), 1);
    assert_eq!(counts.volunteers.load(Ordering::SeqCst), 1);
    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(first.candidates, second.candidates);
    assert_eq!(first.computed_at, second.computed_at);
}

#[test]
fn force_refresh_recomputes() {
    let (engine, counts) = counting_engine(population());
    engine
        .compute_candidates_at(&CandidateRequest::new(CAREER_FAIR), now())
        .unwrap();
    let refreshed = engine
        .compute_candidates_at(&CandidateRequest::new(CAREER_FAIR).force_refresh(), now())
        .unwrap();

    assert!(!refreshed.from_cache);
    assert_eq!(counts.volunteers.load(Ordering::SeqCst), 2);
}

#[test]
fn changed_custom_keywords_invalidate_cached_list() {
    let (engine, counts) = counting_engine(population());

    let plain = engine
        .compute_candidates_at(&CandidateRequest::new(CAREER_FAIR), now())
        .unwrap();
    let custom = engine
        .compute_candidates_at(
            &CandidateRequest::new(CAREER_FAIR).with_custom_keywords("Pastry, baking"),
            now(),
        )
        .unwrap();
    assert!(!custom.from_cache);
    assert_eq!(counts.volunteers.load(Ordering::SeqCst), 2);
    assert!(ids(&custom.candidates).contains(&15));
    assert!(!ids(&plain.candidates).contains(&15));

    // Same keywords, different spelling: still a hit.
    let again = engine
        .compute_candidates_at(
            &CandidateRequest::new(CAREER_FAIR).with_custom_keywords(" pastry ,BAKING,"),
            now(),
        )
        .unwrap();
    assert!(again.from_cache);
    assert_eq!(counts.volunteers.load(Ordering::SeqCst), 2);
}

#[test]
fn failing_cache_degrades_to_recomputation() {
    let (engine, counts) = counting_engine(population());
    let engine = engine.with_cache(Arc::new(BrokenCache));

    for _ in 0..2 {
        let results = engine
            .compute_candidates_at(&CandidateRequest::new(CAREER_FAIR), now())
            .unwrap();
        assert!(!results.from_cache);
        assert_eq!(results.candidates[0].volunteer_id, 10);
    }
    assert_eq!(counts.volunteers.load(Ordering::SeqCst), 2);
    assert!(engine.invalidate(CAREER_FAIR).is_err());
}

#[test]
fn store_failure_surfaces_as_error() {
    let engine = MatchingEngine::new(
        MatchingEngineConfig::default(),
        Arc::new(InMemoryEventStore::new(events())),
        Arc::new(BrokenVolunteers),
    );
    let err = engine
        .compute_candidates_at(&CandidateRequest::new(CAREER_FAIR), now())
        .unwrap_err();
    assert!(matches!(err, MatchingError::Store(StoreError::Unavailable(_))));
}

#[test]
fn missing_event_is_reported() {
    let err = engine(population())
        .compute_candidates_at(&CandidateRequest::new(404), now())
        .unwrap_err();
    assert!(matches!(err, MatchingError::EventNotFound(404)));
    assert_eq!(err.to_string(), "event 404 not found");
}
