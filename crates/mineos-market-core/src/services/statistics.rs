use crate::domain::Statistic;
use crate::error::MarketError;
use crate::pipeline::{Endpoint, RequestPipeline};

const STATISTICS: Endpoint = Endpoint::public("statistics").with_schema(Statistic::schema);

/// Store-wide counters.
#[derive(Clone, Copy)]
pub struct Statistics<'a> {
    pipeline: RequestPipeline<'a>,
}

impl<'a> Statistics<'a> {
    pub(crate) fn new(pipeline: RequestPipeline<'a>) -> Self {
        Self { pipeline }
    }

    pub async fn statistic(&self) -> Result<Statistic, MarketError> {
        self.pipeline.fetch(&STATISTICS, &()).await
    }
}
