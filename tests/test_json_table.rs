use neutron_scatter::{
    FastRng, NeutronNuclearReactionFactory, NuclearReactionType, NuclideTable, Particle,
    ParticleBank, ScatterError, SimulationProperties,
};

const HYDROGEN_TABLE: &str = r#"{
    "name": "1001.80c",
    "atomic_weight_ratio": 0.999167,
    "temperature": 2.5301e-8,
    "energy_grid": [1e-11, 1e-6, 20.0],
    "elastic_cross_section": [1160.0, 20.4, 0.49],
    "mtr": [102.0],
    "lqr": [2.224631],
    "tyr": [0.0],
    "lsig": [1.0],
    "sig": [1.0, 3.0, 16.6, 0.03, 2.9e-5],
    "land": [0.0]
}"#;

#[test]
fn test_hydrogen_from_json() {
    let _ = env_logger::builder().is_test(true).try_init();
    let table = NuclideTable::from_json_str(HYDROGEN_TABLE).unwrap();
    let factory = NeutronNuclearReactionFactory::new(&table, &SimulationProperties::default()).unwrap();

    assert_eq!(factory.scattering_reactions().len(), 1);
    assert_eq!(factory.absorption_reactions().len(), 1);
    assert!(factory.delayed_neutron_emission_distribution().is_none());

    let capture = &factory.absorption_reactions()[&NuclearReactionType::Gamma];
    assert_eq!(capture.get_cross_section(1e-6), 0.03);
    assert_eq!(capture.q_value(), 2.224631);

    // thermal neutrons on hydrogen always see a moving target
    let elastic = &factory.scattering_reactions()[&NuclearReactionType::Elastic];
    let mut bank = ParticleBank::new();
    let mut total = 0.0;
    let n = 2000;
    for history in 0..n {
        let mut rng = FastRng::for_history(42, history);
        let mut particle = Particle::new([0.0; 3], [1.0, 0.0, 0.0], 2.5301e-8);
        elastic.react(&mut particle, &mut bank, &mut rng);
        assert!(particle.energy.is_finite() && particle.energy > 0.0);
        total += particle.energy;
    }
    assert!(bank.is_empty());
    let mean = total / n as f64;
    assert!(mean > 1e-8 && mean < 1e-7, "mean outgoing energy {mean:e}");
}

#[test]
fn test_simulation_properties_from_json() {
    let properties = SimulationProperties::from_json_str(
        r#"{"free_gas_threshold": 400.0, "free_gas_max_iterations": 1000}"#,
    )
    .unwrap();
    assert_eq!(properties.free_gas_threshold, 400.0);
    assert_eq!(properties.free_gas_max_iterations, Some(1000));
    assert!(properties.reset_secondary_collision_number);

    let table = NuclideTable::from_json_str(HYDROGEN_TABLE).unwrap();
    assert!(NeutronNuclearReactionFactory::new(&table, &properties).is_ok());

    let bad = SimulationProperties::default().with_free_gas_threshold(-1.0);
    assert!(matches!(
        NeutronNuclearReactionFactory::new(&table, &bad),
        Err(ScatterError::InvalidConfig(_))
    ));
}

#[test]
fn test_malformed_json_is_reported() {
    assert!(matches!(
        NuclideTable::from_json_str("{\"name\": 3}"),
        Err(ScatterError::Json(_))
    ));

    let mut table = NuclideTable::from_json_str(HYDROGEN_TABLE).unwrap();
    table.land.clear();
    assert!(matches!(
        NeutronNuclearReactionFactory::new(&table, &SimulationProperties::default()),
        Err(ScatterError::MissingBlock { block: "LAND", .. })
    ));
}
