use crate::infra::{InMemoryCrewStore, SeededCatalog};
use clap::Args;
use std::collections::HashMap;
use std::sync::Arc;
use trek_select::error::AppError;
use trek_select::workflows::selection::{
    AggregationMethod, CatalogRepository, CrewPreferences, ProgramId, SelectionService,
    SurveyScore, SurveySubmission,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Aggregation method for the ranking (Total, Average, Median, Mode).
    /// Unrecognized names fall back to Total.
    #[arg(long)]
    pub(crate) method: Option<String>,
    /// Name for the demo crew.
    #[arg(long, default_value = "Troop 123 - Eagle Patrol")]
    pub(crate) crew_name: String,
    /// Include the per-program aggregate table in the output.
    #[arg(long)]
    pub(crate) show_aggregates: bool,
}

struct DemoMember {
    name: &'static str,
    email: &'static str,
    age: u8,
    skill_level: u8,
    scores: &'static [(i64, i32)],
}

const DEMO_MEMBERS: &[DemoMember] = &[
    DemoMember {
        name: "Avery Collins",
        email: "avery@troop123.org",
        age: 16,
        skill_level: 4,
        scores: &[(1, 20), (2, 8), (3, 12), (6, 2), (7, 18)],
    },
    DemoMember {
        name: "Jordan Pike",
        email: "jordan@troop123.org",
        age: 15,
        skill_level: 3,
        scores: &[(1, 14), (2, 16), (4, 6), (5, 4), (7, 10)],
    },
    DemoMember {
        name: "Casey Ruiz",
        email: "casey@troop123.org",
        age: 17,
        skill_level: 5,
        scores: &[(1, 18), (3, 6), (6, 14), (7, 20), (8, 2)],
    },
    DemoMember {
        name: "Morgan Lee",
        email: "morgan@troop123.org",
        age: 14,
        skill_level: 2,
        scores: &[(2, 4), (3, 16), (4, 18), (5, 12), (8, 8)],
    },
];

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        method,
        crew_name,
        show_aggregates,
    } = args;

    let method = method
        .as_deref()
        .map(AggregationMethod::from_name)
        .unwrap_or_default();

    let catalog = Arc::new(SeededCatalog::default());
    let crews = Arc::new(InMemoryCrewStore::default());
    let service = SelectionService::new(catalog.clone(), crews);

    println!("Trek itinerary selection demo");
    println!("Crew: {crew_name}");
    println!("Aggregation method: {}", method.as_str());

    let crew = service.add_crew(&crew_name, DEMO_MEMBERS.len() as u8)?.id;

    println!("\nSurvey intake");
    for member in DEMO_MEMBERS {
        let receipt = service.submit_survey(
            crew,
            SurveySubmission {
                member_id: None,
                name: Some(member.name.to_string()),
                email: Some(member.email.to_string()),
                age: Some(member.age),
                skill_level: Some(member.skill_level),
                scores: member
                    .scores
                    .iter()
                    .map(|&(program_id, score)| SurveyScore {
                        program_id: ProgramId(program_id),
                        score,
                    })
                    .collect(),
            },
        )?;
        println!(
            "- #{} {} -> {} programs scored",
            receipt.member.member_number, receipt.member.name, receipt.scored_programs
        );
    }

    // Crew conference outcome: no Super-Strenuous treks, south country first.
    service.save_preferences(
        crew,
        CrewPreferences {
            area_important: true,
            area_rank_south: Some(1),
            area_rank_central: Some(2),
            max_altitude_important: true,
            max_altitude_threshold: Some(11_000),
            difficulty_super_strenuous: false,
            ..CrewPreferences::default()
        },
    )?;
    println!("\nPreferences: south country first, altitude cap 11,000 ft, no Super-Strenuous");

    if show_aggregates {
        let names: HashMap<ProgramId, String> = catalog
            .programs()?
            .into_iter()
            .map(|program| (program.id, program.name))
            .collect();
        println!("\nAggregate program scores ({})", method.as_str());
        for (program_id, score) in service.aggregate_program_scores(crew, method)? {
            let name = names
                .get(&program_id)
                .map(String::as_str)
                .unwrap_or("(unknown program)");
            println!("- {name}: {score:.1}");
        }
    }

    println!("\nRanked itineraries");
    for entry in service.score_itineraries(crew, method)? {
        println!(
            "{:>2}. {:<6} {:<3} | total {:>7.1} | program {:>6.1} | difficulty {:>5.1} | area {:>5.1} | altitude {:>4.1} | distance {:>5.1}",
            entry.rank,
            entry.itinerary.code,
            entry.itinerary.difficulty.code(),
            entry.total_score,
            entry.components.program,
            entry.components.difficulty,
            entry.components.area,
            entry.components.altitude,
            entry.components.distance,
        );
    }

    Ok(())
}
