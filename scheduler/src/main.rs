use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use log::LevelFilter;
use modreg_scheduler::scheduler::{
    build_scheduler, logger, ModuleRegister, Priority, ProcessRef, ProcessRunner,
    RegistrationTask, RunConfig, Scheduler, SleepWaiter,
};
use std::{env, error::Error, io, sync::Arc, time::Duration};

const SLICE_WORK: Duration = Duration::from_millis(50);

fn registrations(count: usize) -> Vec<ProcessRef> {
    const PRIORITIES: [i32; 3] = [Priority::HIGH, Priority::MEDIUM, Priority::LOW];

    (0..count)
        .map(|i| {
            let modules = (0..2 + i % 4).map(|m| format!("CI{}", 580 + m)).collect();
            let task = RegistrationTask::new(modules, SLICE_WORK);
            let process = ModuleRegister::new(
                &format!("Module {i}"),
                PRIORITIES[i % PRIORITIES.len()],
                Box::new(task),
            );
            Arc::new(process) as ProcessRef
        })
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = RunConfig::from_args(env::args().skip(1))?;
    logger::init(LevelFilter::Debug, config.headless)?;

    let waiter = SleepWaiter::new();
    let waker = waiter.waker();
    let mut scheduler = build_scheduler(config.policy, &config.scheduler, Arc::new(waiter));
    for process in registrations(config.processes) {
        scheduler.enqueue(process)?;
    }

    if config.headless {
        let completed = scheduler.run_to_completion();
        for (index, process) in completed.iter().enumerate() {
            println!("{:>2}. {}", index + 1, process.name());
        }
        return Ok(());
    }

    execute!(io::stdout(), Clear(ClearType::All))?;

    let mut runner = ProcessRunner::new(scheduler, waker)?;
    while runner.run()? {}
    let completed = runner.into_completed();

    execute!(io::stdout(), Clear(ClearType::All))?;
    println!("{} processes completed", completed.len());
    Ok(())
}
