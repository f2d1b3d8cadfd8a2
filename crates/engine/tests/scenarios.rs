use timeline_core::{
    ConfidenceLevel, DependencyType, EngineConfig, EstimateBasis, ItemType, Limits, SectionMap,
    StageType, StructuredTimeline,
};
use timeline_deps::validate;
use timeline_engine::{create_structured_timeline, TimelineEngine};

const THREE_SECTIONS: &str = "Literature Review
The literature review will take 6 months to complete.

Data Collection
Data collection is expected to take 12 months.

Analysis
The analysis phase will take 3 months.";

const FULL_PLAN: &str = "# Doctoral Programme Plan

COURSEWORK

In the first year I will complete the required courses and seminars. The comprehensive exam is mandatory at the end of year one.

Literature Review
A systematic review of prior research and related work, then a research proposal for the committee.

The proposal defense must happen before any data collection. Ethics approval must be obtained before fieldwork.

Data collection in the second year uses surveys and interviews over 18 months.

Analysis of the data follows, using statistical modelling. Once the data is collected I will start coding the transcripts.

- Write up the thesis chapters in the final year
- Submit one journal article and a conference paper
- Thesis submission after the final draft is approved

The oral defense follows submission.";

fn full_plan() -> StructuredTimeline {
    let map = SectionMap::from_titles([("Coursework", 3), ("Literature Review", 7)]);
    create_structured_timeline(FULL_PLAN, Some(&map))
}

#[test]
fn test_three_sections_with_explicit_durations() {
    let map = SectionMap::from_titles([
        ("Literature Review", 1),
        ("Data Collection", 4),
        ("Analysis", 7),
    ]);
    let timeline = create_structured_timeline(THREE_SECTIONS, Some(&map));

    let types: Vec<StageType> = timeline.stages.iter().map(|s| s.stage_type).collect();
    for expected in [StageType::LiteratureReview, StageType::DataCollection, StageType::Analysis] {
        assert!(types.contains(&expected), "missing {:?}", expected);
    }

    for (title, months) in [("Literature Review", 6.0), ("Data Collection", 12.0), ("Analysis", 3.0)] {
        let estimate = timeline.duration_of(title).unwrap();
        assert_eq!(estimate.item_type, ItemType::Stage);
        assert_eq!(estimate.basis, EstimateBasis::Explicit);
        assert_eq!(estimate.confidence, ConfidenceLevel::High);
        assert_eq!(estimate.duration_months_min, months);
        assert_eq!(estimate.duration_months_max, months);
    }

    let sequential = |dependent: &str, depends_on: &str| {
        timeline.dependencies.iter().any(|d| {
            d.dependent_item == dependent
                && d.depends_on_item == depends_on
                && d.dependency_type == DependencyType::Sequential
        })
    };
    assert!(sequential("Data Collection", "Literature Review"));
    assert!(sequential("Analysis", "Data Collection"));

    assert_eq!(timeline.total_duration_months_min, 21.0);
    assert_eq!(timeline.total_duration_months_max, 21.0);
}

#[test]
fn test_ethics_approval_blocks_data_collection() {
    let timeline =
        create_structured_timeline("Ethics approval must be obtained before any data collection.", None);

    assert!(timeline
        .stages
        .iter()
        .any(|s| s.stage_type == StageType::DataCollection));

    let ethics = timeline
        .milestones
        .iter()
        .find(|m| m.name.to_lowercase().contains("ethics approval"))
        .unwrap();
    assert!(ethics.is_critical);

    let block = timeline
        .dependencies
        .iter()
        .find(|d| d.dependency_type == DependencyType::Blocks)
        .unwrap();
    assert_eq!(block.dependent_item, "Data Collection");
    assert_eq!(block.depends_on_item, ethics.name);
}

#[test]
fn test_unrelated_text_is_empty() {
    let timeline = create_structured_timeline("This is random text with no PhD content.", None);

    assert!(timeline.stages.is_empty());
    assert!(timeline.milestones.is_empty());
    assert!(timeline.durations.is_empty());
    assert!(timeline.dependencies.is_empty());
    assert!(timeline.is_dag_valid);
    assert_eq!(timeline.total_duration_months_min, 0.0);
    assert_eq!(timeline.total_duration_months_max, 0.0);
}

#[test]
fn test_empty_input() {
    let timeline = create_structured_timeline("", None);
    assert!(timeline.stages.is_empty());
    assert!(timeline.milestones.is_empty());
    assert!(timeline.is_dag_valid);
    assert_eq!(timeline.total_duration_months_max, 0.0);
}

#[test]
fn test_deterministic() {
    assert_eq!(full_plan(), full_plan());
    assert_eq!(
        create_structured_timeline(THREE_SECTIONS, None),
        create_structured_timeline(THREE_SECTIONS, None)
    );
}

#[test]
fn test_dependencies_are_acyclic() {
    let timeline = full_plan();
    assert!(!timeline.dependencies.is_empty());
    assert!(timeline.is_dag_valid);
    assert!(validate(&timeline.dependencies));

    for dep in &timeline.dependencies {
        assert_ne!(dep.dependent_item, dep.depends_on_item);
    }
}

#[test]
fn test_no_duplicate_edges() {
    let timeline = full_plan();
    let mut pairs: Vec<(&str, &str)> = timeline
        .dependencies
        .iter()
        .map(|d| (d.dependent_item.as_str(), d.depends_on_item.as_str()))
        .collect();
    let total = pairs.len();
    pairs.sort();
    pairs.dedup();
    assert_eq!(pairs.len(), total);
}

#[test]
fn test_milestone_bound_per_stage() {
    let timeline = full_plan();
    assert!(timeline.stages.len() >= 5);

    for stage in &timeline.stages {
        let count = timeline.milestones_for(&stage.title).count();
        assert!((2..=5).contains(&count), "{} has {} milestones", stage.title, count);
    }
}

#[test]
fn test_milestone_bound_with_custom_limits() {
    let config = EngineConfig {
        limits: Limits {
            min_milestones_per_stage: 3,
            max_milestones_per_stage: 3,
            ..Limits::default()
        },
        ..EngineConfig::default()
    };
    let timeline = TimelineEngine::new()
        .with_config(config)
        .create_structured_timeline(FULL_PLAN, None);

    for stage in &timeline.stages {
        assert_eq!(timeline.milestones_for(&stage.title).count(), 3);
    }
}

#[test]
fn test_duration_ranges_are_ordered() {
    let timeline = full_plan();
    assert_eq!(
        timeline.durations.len(),
        timeline.stages.len() + timeline.milestones.len()
    );
    for estimate in &timeline.durations {
        assert!(estimate.duration_weeks_min <= estimate.duration_weeks_max);
        assert!(estimate.duration_months_min <= estimate.duration_months_max);
    }
}

#[test]
fn test_confidences_are_bounded() {
    let timeline = full_plan();
    let all = timeline
        .stages
        .iter()
        .map(|s| s.confidence)
        .chain(timeline.milestones.iter().map(|m| m.confidence))
        .chain(timeline.dependencies.iter().map(|d| d.confidence));
    for confidence in all {
        assert!((0.0..=1.0).contains(&confidence));
    }
}

#[test]
fn test_stages_in_chronological_order() {
    let timeline = full_plan();
    let hints: Vec<u8> = timeline.stages.iter().map(|s| s.order_hint).collect();
    let mut sorted = hints.clone();
    sorted.sort();
    assert_eq!(hints, sorted);
    assert_eq!(timeline.stages[0].stage_type, StageType::Coursework);
}

#[test]
fn test_title_from_markdown_header() {
    assert_eq!(full_plan().title, "Doctoral Programme Plan");
}

#[test]
fn test_json_shape() {
    let json = serde_json::to_value(full_plan()).unwrap();
    assert_eq!(json["stages"][0]["stage_type"], "COURSEWORK");
    assert!(json["durations"][0]["basis"].is_string());
    assert_eq!(json["is_dag_valid"], true);
}
