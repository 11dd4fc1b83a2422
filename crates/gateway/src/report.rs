use schema::FoodReport;

/// Plain-text rendering of a report, one section per heading.
pub fn render_text(report: &FoodReport) -> String {
    let n = &report.nutrition;

    format!(
        "Prediksi: {dish}\n\n\
         Bahan-Bahan\n{ingredient}\n\n\
         Langkah-Langkah\n{step}\n\n\
         Informasi Gizi\n\
         Kalori: {calories} kcal\n\
         Karbohidrat: {carbohydrate} g\n\
         Protein: {proteins} g\n\
         Lemak: {fat} g\n",
        dish = report.dish.display_name,
        ingredient = report.ingredient,
        step = report.step,
        calories = n.calories,
        carbohydrate = n.carbohydrate,
        proteins = n.proteins,
        fat = n.fat,
    )
}
